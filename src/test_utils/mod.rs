//! Test utilities for tfstate-inventory
//!
//! Shared helpers for unit tests:
//! - `init_test_logging` routes `tracing` output through the test writer
//! - `FakeTerraform` is a scripted terraform replacement (unix only)
//! - `TestGit` builds local repositories to clone from
//! - `RecordingRegistry` captures the registry calls made by the builder

#[cfg(unix)]
pub mod fake_terraform;
pub mod git_helper;

#[cfg(unix)]
pub use fake_terraform::{FakeTerraform, FakeTerraformBuilder, Invocation};
pub use git_helper::TestGit;

use serde_json::Value;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::inventory::InventoryRegistry;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A registry call, as seen by [`RecordingRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCall {
    AddHost(String),
    AddGroup(String),
    AddChild(String, String),
    SetVariable(String, String, Value),
}

/// Registry that records calls in order instead of building anything.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub calls: Vec<RegistryCall>,
}

impl InventoryRegistry for RecordingRegistry {
    fn add_host(&mut self, host: &str) {
        self.calls.push(RegistryCall::AddHost(host.to_string()));
    }

    fn add_group(&mut self, group: &str) {
        self.calls.push(RegistryCall::AddGroup(group.to_string()));
    }

    fn add_child(&mut self, group: &str, host: &str) {
        self.calls.push(RegistryCall::AddChild(group.to_string(), host.to_string()));
    }

    fn set_variable(&mut self, host: &str, key: &str, value: Value) {
        self.calls.push(RegistryCall::SetVariable(host.to_string(), key.to_string(), value));
    }
}

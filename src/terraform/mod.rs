//! Terraform invocation
//!
//! The inventory needs exactly two terraform commands per workspace:
//!
//! 1. `terraform init [-backend-config key=value ...]` so the workspace can
//!    read its (possibly remote) state
//! 2. `terraform show -json` to dump that state as a JSON document
//!
//! Both run with the workspace directory as working directory and
//! `TF_IN_AUTOMATION=1` set. When a workspace has `remote_state`, a
//! `backend_<type>.tf` file declaring an empty backend block is written into
//! the workspace before `init`, and the remaining `remote_state` keys are
//! passed as `-backend-config` pairs in the order they were written.
//!
//! # Modules
//!
//! - `state` - model of the `show -json` document

pub mod state;

pub use state::{ResourceRecord, StateDocument};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::ToolCommand;
use crate::config::RemoteState;
use crate::core::{InventoryError, Result};

/// File name of the generated backend declaration.
#[must_use]
pub fn backend_file_name(backend_type: &str) -> String {
    format!("backend_{backend_type}.tf")
}

/// HCL content of the generated backend declaration.
#[must_use]
pub fn backend_file_content(backend_type: &str) -> String {
    format!("terraform {{\n    backend \"{backend_type}\" {{}}\n}}\n")
}

/// Writes `backend_<type>.tf` into `dir`, replacing any previous copy.
///
/// # Errors
///
/// [`InventoryError::WorkspaceError`] when the file cannot be written.
pub fn write_backend_file(dir: &Path, backend_type: &str) -> Result<PathBuf> {
    let path = dir.join(backend_file_name(backend_type));
    std::fs::write(&path, backend_file_content(backend_type)).map_err(|e| {
        InventoryError::workspace(
            dir.display().to_string(),
            format!("cannot write {}: {e}", path.display()),
        )
    })?;
    tracing::debug!(target: "terraform", "Wrote backend file {}", path.display());
    Ok(path)
}

/// A resolved terraform executable plus invocation settings.
#[derive(Debug, Clone)]
pub struct TerraformCli {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl TerraformCli {
    /// Wraps an already resolved executable.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Bounds every invocation.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.binary)
            .current_dir(dir)
            .env("TF_IN_AUTOMATION", "1")
            .with_timeout(self.timeout)
    }

    /// Builds the `init` command for `dir`.
    ///
    /// With `remote_state`, the backend file is written first, so the
    /// returned command is ready to run.
    ///
    /// # Errors
    ///
    /// [`InventoryError::WorkspaceError`] when the backend file cannot be
    /// written.
    pub fn init_command(
        &self,
        dir: &Path,
        remote_state: Option<&RemoteState>,
    ) -> Result<ToolCommand> {
        let mut cmd = self.command(dir).arg("init");

        if let Some(state) = remote_state {
            write_backend_file(dir, &state.backend_type)?;
            for pair in state.backend_config_pairs() {
                cmd = cmd.arg("-backend-config").arg(pair);
            }
        }

        Ok(cmd.with_context(format!("terraform init in {}", dir.display())))
    }

    /// Runs `init` in `dir`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ToolInvocationError`] on a non-zero exit, spawn
    ///   failure or timeout
    /// - [`InventoryError::WorkspaceError`] when `dir` does not exist or the
    ///   backend file cannot be written
    pub async fn init(&self, dir: &Path, remote_state: Option<&RemoteState>) -> Result<()> {
        tracing::info!(target: "terraform", "Initializing {}", dir.display());
        self.init_command(dir, remote_state)?.execute_checked().await?;
        Ok(())
    }

    /// Builds the `show -json` command for `dir`.
    #[must_use]
    pub fn show_command(&self, dir: &Path) -> ToolCommand {
        self.command(dir)
            .args(["show", "-json"])
            .with_context(format!("terraform show in {}", dir.display()))
    }

    /// Runs `show -json` in `dir` and decodes the state.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ToolInvocationError`] on a non-zero exit, spawn
    ///   failure or timeout
    /// - [`InventoryError::MalformedStateError`] when stdout is not a state
    ///   document
    /// - [`InventoryError::WorkspaceError`] when `dir` does not exist
    pub async fn show(&self, dir: &Path) -> Result<StateDocument> {
        let output = self.show_command(dir).execute_checked().await?;
        let document = StateDocument::parse(&output.stdout)?;
        tracing::debug!(
            target: "terraform",
            "State of {} lists {} root resource(s)",
            dir.display(),
            document.resources().len()
        );
        Ok(document)
    }
}

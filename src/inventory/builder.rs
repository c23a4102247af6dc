//! Workspace-to-inventory pipeline
//!
//! [`InventoryBuilder::populate`] walks the configured workspaces in order.
//! Each one goes through the same steps:
//!
//! ```text
//! resolve ──► terraform init ──► terraform show -json ──► filter ──► populate
//!    │                                                                  │
//!    └──────────────── checkout removed when the iteration ends ◄───────┘
//! ```
//!
//! Steps are awaited one after the other; nothing runs concurrently. The
//! first failing workspace stops the run with its error, and whatever earlier
//! workspaces registered stays registered.

use serde_json::Value;
use std::path::PathBuf;

use super::InventoryRegistry;
use crate::config::{InventoryConfig, WorkspaceSpec};
use crate::constants::ANSIBLE_HOST_VAR;
use crate::core::Result;
use crate::resource::flatten::host_variables;
use crate::resource::naming::group_name_for_tag;
use crate::terraform::{ResourceRecord, TerraformCli};
use crate::utils::platform::resolve_tool_binary;
use crate::workspace::{ResolveOptions, resolve_workspace};

/// Counters for one [`InventoryBuilder::populate`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    /// Workspaces that completed every step
    pub workspaces: usize,
    /// Root-module resources reported by `show`
    pub resources_seen: usize,
    /// Resources that passed the filters
    pub resources_matched: usize,
    /// Hosts registered
    pub hosts_added: usize,
    /// Matched resources without any configured access parameter
    pub resources_skipped: usize,
}

/// Drives the pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct InventoryBuilder {
    config: InventoryConfig,
    terraform: TerraformCli,
    resolve_options: ResolveOptions,
}

impl InventoryBuilder {
    /// Creates a builder, resolving the terraform executable up front.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`](crate::core::InventoryError::ConfigurationError)
    /// when the executable cannot be found.
    pub fn new(config: InventoryConfig) -> Result<Self> {
        let binary = resolve_tool_binary(config.binary_path.as_deref())?;
        Ok(Self::with_terraform(config, TerraformCli::new(binary)))
    }

    /// Creates a builder around an already resolved terraform.
    ///
    /// The configured `command_timeout` is applied to `terraform`.
    #[must_use]
    pub fn with_terraform(config: InventoryConfig, terraform: TerraformCli) -> Self {
        let terraform = terraform.with_timeout(config.command_timeout);
        let resolve_options = ResolveOptions {
            timeout: config.command_timeout,
            checkout_root: None,
        };
        Self {
            config,
            terraform,
            resolve_options,
        }
    }

    /// Places temporary checkouts under `root`.
    #[must_use]
    pub fn with_checkout_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resolve_options.checkout_root = Some(root.into());
        self
    }

    /// Runs every workspace through the pipeline into `registry`.
    ///
    /// # Errors
    ///
    /// The first [`InventoryError`](crate::core::InventoryError) raised by any
    /// workspace. Hosts registered before the failure are kept.
    pub async fn populate<R>(&self, registry: &mut R) -> Result<PopulateSummary>
    where
        R: InventoryRegistry + ?Sized,
    {
        let mut summary = PopulateSummary::default();

        for (index, spec) in self.config.workspaces.iter().enumerate() {
            tracing::info!(
                target: "inventory",
                "Processing workspace {}/{}: {}",
                index + 1,
                self.config.workspaces.len(),
                spec
            );
            if let Err(e) = self.process_workspace(spec, registry, &mut summary).await {
                tracing::error!(target: "inventory", "Workspace {} failed: {}", spec, e);
                return Err(e);
            }
            summary.workspaces += 1;
        }

        Ok(summary)
    }

    async fn process_workspace<R>(
        &self,
        spec: &WorkspaceSpec,
        registry: &mut R,
        summary: &mut PopulateSummary,
    ) -> Result<()>
    where
        R: InventoryRegistry + ?Sized,
    {
        // Holds the checkout, if any, until this function returns.
        let workspace = resolve_workspace(spec, &self.resolve_options).await?;

        self.terraform.init(workspace.dir(), spec.remote_state.as_ref()).await?;
        let document = self.terraform.show(workspace.dir()).await?;

        let resources = document.resources();
        let matched = self.config.filter.apply(resources);
        tracing::debug!(
            target: "inventory",
            "{} of {} resource(s) in {} passed the filters",
            matched.len(),
            resources.len(),
            spec
        );
        summary.resources_seen += resources.len();
        summary.resources_matched += matched.len();

        for record in matched {
            if add_resource(registry, record, &self.config.access_params) {
                summary.hosts_added += 1;
            } else {
                summary.resources_skipped += 1;
            }
        }

        Ok(())
    }
}

/// Registers one resource as a host.
///
/// The first of `access_params` present in the resource's values becomes
/// `ansible_host`; a present key counts even when its value is `null`. Every
/// non-null flattened attribute becomes a host variable, and every
/// `tags_all` entry adds the host to its `tag_<key>_<value>` group.
///
/// String tag values are used as they are. Any other value is named by its
/// JSON text, so `null` gives `tag_K_null` and `false` gives `tag_K_false`.
///
/// Returns `false`, registering nothing, when no access parameter is present.
pub fn add_resource<R>(
    registry: &mut R,
    record: &ResourceRecord,
    access_params: &[String],
) -> bool
where
    R: InventoryRegistry + ?Sized,
{
    let Some(host_address) = access_params.iter().find_map(|key| record.attribute(key)) else {
        tracing::warn!(
            target: "inventory",
            "Skipping {}: none of the access parameters [{}] is present",
            record.address,
            access_params.join(", ")
        );
        return false;
    };

    let host = record.address.as_str();
    registry.add_host(host);
    registry.set_variable(host, ANSIBLE_HOST_VAR, host_address.clone());

    if let Some(values) = &record.values {
        for (key, value) in host_variables(&Value::Object(values.clone())) {
            registry.set_variable(host, &key, value);
        }
    }

    if let Some(tags) = record.tags_all() {
        for (key, value) in tags {
            let group = match value {
                Value::String(text) => group_name_for_tag(key, text),
                other => group_name_for_tag(key, &other.to_string()),
            };
            registry.add_group(&group);
            registry.add_child(&group, host);
        }
    }

    tracing::debug!(target: "inventory", "Added host {} ({})", host, host_address);
    true
}

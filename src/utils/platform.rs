//! Platform-specific helpers: command names, path expansion and executable lookup
//!
//! Everything that depends on the host environment (the `PATH`, the home
//! directory, environment variables) is funnelled through this module so the
//! rest of the pipeline only deals with resolved paths.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tfstate_inventory::utils::platform::{resolve_path, resolve_tool_binary};
//!
//! # fn example() -> anyhow::Result<()> {
//! let terraform = resolve_tool_binary(None)?;
//! let project = resolve_path("~/infra/prod")?;
//! println!("{} in {}", terraform.display(), project.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::constants::DEFAULT_TERRAFORM_BINARY;
use crate::core::{InventoryError, Result};

/// Returns `true` when compiled for Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the platform-appropriate git command name.
///
/// The name is resolved through `PATH` when the command is spawned.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path.
///
/// Undefined variables are a [`InventoryError::ConfigurationError`] rather
/// than being silently left in place.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| {
        InventoryError::config(format!("Cannot expand path '{path}': {e}"))
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Checks whether a command is available on `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Resolves the terraform executable once, before any workspace is processed.
///
/// A configured `binary_path` may be a path or a bare command name; either way
/// it must name an existing executable. Without one, `terraform` is looked up
/// on `PATH`.
///
/// # Errors
///
/// Returns [`InventoryError::ConfigurationError`] when the configured path
/// does not exist or is not executable, or when nothing is found on `PATH`.
pub fn resolve_tool_binary(configured: Option<&str>) -> Result<PathBuf> {
    match configured {
        Some(binary) => {
            let expanded = resolve_path(binary)?;
            let resolved = which::which(&expanded).map_err(|e| {
                InventoryError::config(format!(
                    "Path for terraform binary_path '{binary}' does not exist or is not executable: {e}"
                ))
            })?;
            tracing::debug!(target: "terraform", "Using configured binary {}", resolved.display());
            Ok(resolved)
        }
        None => {
            let resolved = which::which(DEFAULT_TERRAFORM_BINARY).map_err(|e| {
                InventoryError::config(format!(
                    "Unable to locate '{DEFAULT_TERRAFORM_BINARY}' on PATH: {e}"
                ))
            })?;
            tracing::debug!(target: "terraform", "Found {} on PATH", resolved.display());
            Ok(resolved)
        }
    }
}

//! Workspace resolution
//!
//! Turns a configured [`WorkspaceSpec`] into a directory terraform can run
//! in. Local paths are used as they are. Repository sources are cloned into a
//! fresh temporary directory whose lifetime is tied to the returned
//! [`ResolvedWorkspace`]: dropping it removes the checkout, whether the
//! caller finished normally, returned an error or unwound.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{WorkspaceLocation, WorkspaceSpec};
use crate::constants::CHECKOUT_DIR_PREFIX;
use crate::core::{InventoryError, Result};
use crate::git::clone_repository;
use crate::utils::temp::TempDir;

/// Options that apply to every workspace resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Bound on the clone, `None` to wait indefinitely
    pub timeout: Option<Duration>,
    /// Parent of temporary checkouts, `None` for the system temporary directory
    pub checkout_root: Option<PathBuf>,
}

/// A directory ready for terraform, plus the checkout guard when there is one.
#[derive(Debug)]
pub struct ResolvedWorkspace {
    dir: PathBuf,
    checkout: Option<TempDir>,
}

impl ResolvedWorkspace {
    /// Directory terraform runs in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the directory is a temporary checkout removed on drop.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.checkout.is_some()
    }
}

/// Resolves `spec` to a usable directory.
///
/// Local paths are not checked here; a missing directory surfaces when the
/// first command is spawned in it.
///
/// # Errors
///
/// [`InventoryError::WorkspaceError`] when the temporary directory cannot be
/// created or the clone fails. No checkout is left behind in either case.
pub async fn resolve_workspace(
    spec: &WorkspaceSpec,
    options: &ResolveOptions,
) -> Result<ResolvedWorkspace> {
    match &spec.location {
        WorkspaceLocation::Path(path) => {
            tracing::debug!(target: "workspace", "Using local workspace {}", path.display());
            Ok(ResolvedWorkspace {
                dir: path.clone(),
                checkout: None,
            })
        }
        WorkspaceLocation::Git(url) => {
            let checkout = match &options.checkout_root {
                Some(root) => TempDir::new_in(root, CHECKOUT_DIR_PREFIX),
                None => TempDir::new(CHECKOUT_DIR_PREFIX),
            }
            .map_err(|e| {
                InventoryError::workspace(url, format!("cannot create temporary directory: {e}"))
            })?;

            // On failure `checkout` drops here and takes the partial clone with it.
            clone_repository(url, checkout.path(), options.timeout).await?;

            tracing::debug!(
                target: "workspace",
                "Checked out {} into {}",
                url,
                checkout.path().display()
            );
            Ok(ResolvedWorkspace {
                dir: checkout.path().to_path_buf(),
                checkout: Some(checkout),
            })
        }
    }
}

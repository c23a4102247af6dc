//! Temporary directory management with RAII cleanup.
//!
//! Git-backed workspaces are cloned into a [`TempDir`]; dropping it removes
//! the checkout and everything terraform wrote into it (`.terraform/`, the
//! generated backend file), whichever way the workspace iteration ended.

use std::path::{Path, PathBuf};

/// A temporary directory that is removed, contents included, when dropped.
///
/// Each instance gets a unique name `tfstate_inventory_{prefix}_{uuid}` under
/// the system temporary directory, so concurrent runs never collide.
///
/// # Examples
///
/// ```rust,no_run
/// use tfstate_inventory::utils::temp::TempDir;
///
/// # fn example() -> std::io::Result<()> {
/// let path = {
///     let temp = TempDir::new("checkout")?;
///     std::fs::write(temp.path().join("main.tf"), "")?;
///     temp.path().to_path_buf()
/// };
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Creates a new, empty temporary directory with the given prefix.
    pub fn new(prefix: &str) -> std::io::Result<Self> {
        Self::new_in(&std::env::temp_dir(), prefix)
    }

    /// Like [`new`](Self::new), but under `parent` instead of the system
    /// temporary directory. `parent` is created if needed.
    pub fn new_in(parent: &Path, prefix: &str) -> std::io::Result<Self> {
        let unique_name = format!("tfstate_inventory_{}_{}", prefix, uuid::Uuid::new_v4());
        let path = parent.join(unique_name);

        std::fs::create_dir_all(&path)?;
        tracing::debug!(target: "workspace", "Created temporary directory {}", path.display());

        Ok(Self {
            path,
        })
    }

    /// Returns the path to the temporary directory.
    ///
    /// The directory exists for as long as this `TempDir` is alive.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {
                tracing::debug!(
                    target: "workspace",
                    "Removed temporary directory {}",
                    self.path.display()
                );
            }
            Err(e) => {
                tracing::warn!(
                    target: "workspace",
                    "Failed to remove temporary directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

//! Git operations used to check out remote workspaces
//!
//! Like the rest of the crate this shells out to the system `git` binary
//! rather than linking a git library, so authentication, proxies and
//! credential helpers behave exactly as they do for the user's own shell.
//!
//! Only one operation is needed: a plain `git clone <url> <dir>` into a fresh
//! temporary directory owned by the caller.

use std::path::Path;
use std::time::Duration;

use crate::command::ToolCommand;
use crate::core::{InventoryError, Result};
use crate::utils::platform::get_git_command;

/// Builds the clone command for `url` into `target`.
///
/// Terminal prompts are disabled so a repository that needs interactive
/// credentials fails instead of blocking the run.
#[must_use]
pub fn clone_command(url: &str, target: &Path) -> ToolCommand {
    ToolCommand::new(get_git_command())
        .arg("clone")
        .arg(url)
        .arg(target.display().to_string())
        .env("GIT_TERMINAL_PROMPT", "0")
        .with_context(format!("git clone {url}"))
}

/// Clones `url` directly into `target`, which must be empty or absent.
///
/// # Errors
///
/// Returns [`InventoryError::WorkspaceError`] when git cannot be spawned,
/// times out, or exits non-zero. The error reason carries git's stderr.
pub async fn clone_repository(url: &str, target: &Path, timeout: Option<Duration>) -> Result<()> {
    tracing::info!(target: "git", "Cloning {} into {}", url, target.display());

    let output = clone_command(url, target).with_timeout(timeout).execute_checked().await;

    match output {
        Ok(_) => Ok(()),
        Err(InventoryError::ToolInvocationError { exit_code, stderr, .. }) => {
            let reason = match exit_code {
                Some(code) => format!("git clone exited with {code}: {}", stderr.trim()),
                None => format!("git clone failed: {}", stderr.trim()),
            };
            Err(InventoryError::workspace(url, reason))
        }
        Err(other) => Err(other),
    }
}

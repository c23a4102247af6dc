//! Git test helper utilities
//!
//! Creates throwaway local repositories that workspace tests can clone over
//! `file://` URLs, without any network access.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command wrapper for tests.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    /// Create a new TestGit instance for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Initialize a repository with a test identity
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.repo_path)
            .with_context(|| format!("Failed to create {}", self.repo_path.display()))?;
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        self.run_git_command(
            &["config", "user.email", "test@tfstate-inventory.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(
            &["config", "user.name", "Test User"],
            "Failed to configure git user name",
        )?;
        Ok(())
    }

    /// Initialize, write `files` (relative path, content) and commit them
    pub fn init_with_files(&self, files: &[(&str, &str)]) -> Result<()> {
        self.init()?;
        for (relative, content) in files {
            let path = self.repo_path.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        self.run_git_command(&["commit", "-m", "Initial commit"], "Failed to create git commit")?;
        Ok(())
    }

    /// Return the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// `file://` URL suitable for `git clone`
    pub fn url(&self) -> String {
        format!("file://{}", self.repo_path.display())
    }
}

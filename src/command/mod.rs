//! Builder for external command execution with consistent output capture
//!
//! Both external collaborators, terraform and git, are driven through
//! [`ToolCommand`]. It captures stdout and stderr, logs the invocation, and
//! turns spawn failures and timeouts into [`InventoryError`] values so callers
//! only need to decide what a non-zero exit means for them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tfstate_inventory::command::ToolCommand;
//!
//! # async fn example() -> tfstate_inventory::core::Result<()> {
//! let output = ToolCommand::new("terraform")
//!     .args(["show", "-json"])
//!     .current_dir("/srv/infra")
//!     .execute_checked()
//!     .await?;
//! println!("{}", output.stdout);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::{InventoryError, Result};

/// Builder for one external command invocation.
///
/// Defaults: output captured, no timeout, inherits the parent environment and
/// working directory. A command without a timeout waits for the child for as
/// long as it runs.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Program to execute (a resolved path or a name looked up on `PATH`)
    program: PathBuf,

    /// Arguments in the order they are passed
    args: Vec<String>,

    /// Working directory for the child process
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the child process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for the child (None = wait forever)
    timeout_duration: Option<Duration>,

    /// Optional context string prefixed to log lines
    context: Option<String>,
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the child was terminated by a signal
    pub exit_code: Option<i32>,
    /// Whether the child exited successfully
    pub success: bool,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

impl ToolCommand {
    /// Creates a builder for `program` with default settings.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: None,
            context: None,
        }
    }

    /// Sets the working directory of the child process.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Sets or clears the timeout. The child is killed when it expires.
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Adds context that is included in log lines.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The program that will be executed.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments that will be passed.
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The configured working directory, if any.
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Renders the command line for logs and error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the command and captures its output.
    ///
    /// A non-zero exit is *not* an error here; see
    /// [`execute_checked`](Self::execute_checked).
    ///
    /// # Errors
    ///
    /// - [`InventoryError::WorkspaceError`] when the working directory does
    ///   not exist, so the child could not be spawned in it
    /// - [`InventoryError::ToolInvocationError`] for any other spawn failure
    ///   and for timeouts
    pub async fn execute(self) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let command_line = self.command_line();
        let label = self.context.as_deref().unwrap_or("command");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "command", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(target: "command", "({}) Executing: {}", label, command_line);

        let output_future = cmd.output();
        let result = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "command",
                        "({}) Timed out after {:?}: {}",
                        label,
                        duration,
                        command_line
                    );
                    return Err(InventoryError::ToolInvocationError {
                        command: command_line,
                        exit_code: None,
                        stdout: String::new(),
                        stderr: format!("Command timed out after {duration:?}"),
                    });
                }
            },
            None => output_future.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                if let Some(dir) = self.current_dir.as_deref() {
                    if !dir.is_dir() {
                        return Err(InventoryError::workspace(
                            dir.display().to_string(),
                            format!("directory does not exist or is not accessible ({e})"),
                        ));
                    }
                }
                return Err(InventoryError::ToolInvocationError {
                    command: command_line,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("Failed to spawn process: {e}"),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            tracing::debug!(target: "command", "({}) stderr: {}", label, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "command::perf",
                "({}) took {:.2}s",
                label,
                elapsed.as_secs_f64()
            );
        } else {
            tracing::trace!(target: "command::perf", "({}) took {}ms", label, elapsed.as_millis());
        }

        Ok(CommandOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout,
            stderr,
        })
    }

    /// Runs the command and treats a non-zero exit as an error.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus
    /// [`InventoryError::ToolInvocationError`] carrying the exit code and both
    /// output streams when the child exits unsuccessfully.
    pub async fn execute_checked(self) -> Result<CommandOutput> {
        let command_line = self.command_line();
        let output = self.execute().await?;

        if !output.success {
            tracing::debug!(
                target: "command",
                "Command failed with exit code {:?}: {}",
                output.exit_code,
                command_line
            );
            return Err(InventoryError::ToolInvocationError {
                command: command_line,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}

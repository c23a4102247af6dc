//! Error handling for tfstate-inventory
//!
//! Every failure the inventory pipeline can raise is one of four
//! [`InventoryError`] variants. The library surfaces them as a single error
//! type; the binary converts them into an [`ErrorContext`] with details and a
//! suggestion before printing them.
//!
//! # Error Categories
//!
//! - **Configuration**: [`InventoryError::ConfigurationError`] for missing or
//!   invalid options and an unresolvable terraform executable. Raised before
//!   any workspace is processed.
//! - **Workspace**: [`InventoryError::WorkspaceError`] for clone failures and
//!   inaccessible workspace directories.
//! - **Tool invocation**: [`InventoryError::ToolInvocationError`] for a
//!   terraform command that exited non-zero, could not be spawned, or timed out.
//! - **Malformed state**: [`InventoryError::MalformedStateError`] for
//!   `show -json` output that is not JSON or lacks the `values` root field.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tfstate_inventory::core::{InventoryError, user_friendly_error};
//!
//! let error = InventoryError::ConfigurationError {
//!     message: "project_path must exist".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The error type for every inventory operation.
///
/// Each variant keeps enough context to diagnose the failure without
/// re-running the pipeline: tool errors carry the exit code and both output
/// streams, state errors carry the raw payload.
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// Missing or invalid configuration, or terraform could not be located
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the invalid or missing option
        message: String,
    },

    /// A workspace directory could not be acquired
    #[error("Workspace '{workspace}' is unavailable: {reason}")]
    WorkspaceError {
        /// Path or repository URL identifying the workspace
        workspace: String,
        /// Why the workspace could not be used
        reason: String,
    },

    /// An external tool invocation failed
    #[error(
        "Error running {command}: {}\n -- {stderr}\n -- {stdout}",
        .exit_code.map_or_else(|| "no exit code".to_string(), |code| code.to_string())
    )]
    ToolInvocationError {
        /// The full command line that was executed
        command: String,
        /// Process exit code, `None` when the process never exited normally
        exit_code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// `show -json` output could not be used as a state document
    #[error("Invalid result from show ({reason}). Project may be missing remote state: {payload}")]
    MalformedStateError {
        /// What was wrong with the payload
        reason: String,
        /// The raw (or decoded) payload, for debugging
        payload: String,
    },
}

impl InventoryError {
    /// Shorthand for a [`InventoryError::ConfigurationError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Shorthand for a [`InventoryError::WorkspaceError`].
    pub fn workspace(workspace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WorkspaceError {
            workspace: workspace.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used across the library.
pub type Result<T, E = InventoryError> = std::result::Result<T, E>;

/// Error context wrapper that adds user-facing details and a suggestion.
///
/// When displayed, the error is printed in red, details in yellow and the
/// suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error, `None` for errors that did not originate here
    pub error: Option<InventoryError>,
    /// Message shown when `error` is `None`
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps an [`InventoryError`] without suggestion or details.
    #[must_use]
    pub fn new(error: InventoryError) -> Self {
        Self {
            message: error.to_string(),
            error: Some(error),
            suggestion: None,
            details: None,
        }
    }

    /// Wraps an arbitrary message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// [`InventoryError`] values anywhere in the `anyhow` chain get a tailored
/// suggestion, with any context attached above them kept as a message
/// prefix. Anything else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut contexts = Vec::new();
    for cause in error.chain() {
        if let Some(inventory_error) = cause.downcast_ref::<InventoryError>() {
            let mut ctx = create_error_context(inventory_error.clone());
            if !contexts.is_empty() {
                contexts.push(ctx.message);
                ctx.message = contexts.join(": ");
            }
            return ctx;
        }
        contexts.push(cause.to_string());
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::other(message)
}

fn create_error_context(error: InventoryError) -> ErrorContext {
    match &error {
        InventoryError::ConfigurationError { message } => {
            let suggestion = if message.contains("terraform") || message.contains("binary_path") {
                "Install terraform and make sure it is on PATH, or point binary_path at the executable"
            } else if message.contains("regex") {
                "Check the regular expressions in address_list and tag_list"
            } else {
                "Check the inventory configuration file: every project_path entry needs exactly one of 'path' or 'git'"
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("The configuration is validated before any workspace is processed")
        }

        InventoryError::WorkspaceError { workspace, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Verify that '{workspace}' is an existing directory or a reachable git repository"
            ))
            .with_details(
                "Git checkouts are cloned into a temporary directory that is removed afterwards",
            ),

        InventoryError::ToolInvocationError { command, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Run '{command}' manually in the workspace directory to investigate"
            ))
            .with_details(
                "terraform init must succeed before the state can be read. Backend credentials and network access are common culprits",
            ),

        InventoryError::MalformedStateError { .. } => ErrorContext::new(error.clone())
            .with_suggestion(
                "Make sure the workspace has been applied and its remote_state settings point at the right backend",
            )
            .with_details("terraform show -json returned a document without a 'values' root field"),
    }
}

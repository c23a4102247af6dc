//! Platform helpers and temporary directories
//!
//! # Modules
//!
//! - [`platform`] - command names, path expansion and executable lookup
//! - [`temp`] - self-removing temporary directories for checkouts

pub mod platform;
pub mod temp;

pub use platform::{command_exists, resolve_path, resolve_tool_binary};
pub use temp::TempDir;

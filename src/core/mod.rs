//! Core types shared by every stage of the inventory pipeline
//!
//! The only inhabitant today is the error system:
//! - [`InventoryError`] - the single error type the library returns
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - converts any `anyhow::Error` for CLI display

pub mod error;

pub use error::{ErrorContext, InventoryError, Result, user_friendly_error};

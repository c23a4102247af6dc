//! Generic YAML parsing with file path context
//!
//! YAML is a superset of JSON, so the same entry points accept inventory
//! files written in either format. Failures are reported as
//! [`InventoryError::ConfigurationError`] naming the file and, for parse
//! errors, the line and column serde_yaml points at.

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::{InventoryError, Result};

/// Parses configuration text into `T`.
///
/// `origin` names the source in error messages (a file path, or something
/// like `"<inline>"`).
///
/// # Errors
///
/// [`InventoryError::ConfigurationError`] when the text is not valid YAML or
/// does not match the shape of `T`.
pub fn parse_config_str<T>(content: &str, origin: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_yaml::from_str(content)
        .map_err(|e| InventoryError::config(format!("Failed to parse config file {origin}: {e}")))
}

/// Reads and parses a configuration file into `T`.
///
/// # Errors
///
/// [`InventoryError::ConfigurationError`] when the file cannot be read, or
/// for any failure of [`parse_config_str`].
pub async fn parse_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        InventoryError::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    parse_config_str(&content, &path.display().to_string())
}

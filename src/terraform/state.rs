//! Data model for `terraform show -json` output
//!
//! Only the parts the inventory needs are modelled. Everything else in the
//! document (provider schemas, outputs, format version) is ignored, and
//! missing optional parts default to empty rather than failing, since an
//! empty workspace legitimately reports no `root_module`.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::constants::TAGS_ALL_KEY;
use crate::core::{InventoryError, Result};

/// One infrastructure resource as reported in the state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceRecord {
    /// Resource type, e.g. `aws_instance`
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Address unique within the workspace, e.g. `aws_instance.web[0]`
    pub address: String,

    /// Attribute tree; `None` when the state omits it
    #[serde(default)]
    pub values: Option<Map<String, Value>>,
}

impl ResourceRecord {
    /// Convenience constructor, mostly for tests and fixtures.
    #[must_use]
    pub fn new(
        resource_type: impl Into<String>,
        address: impl Into<String>,
        values: Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            address: address.into(),
            values: match values {
                Value::Object(map) => Some(map),
                _ => None,
            },
        }
    }

    /// The `tags_all` mapping, if the resource has one.
    #[must_use]
    pub fn tags_all(&self) -> Option<&Map<String, Value>> {
        self.values.as_ref()?.get(TAGS_ALL_KEY)?.as_object()
    }

    /// Looks up a top-level attribute. `Some(&Value::Null)` means the key is
    /// present with a null value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.values.as_ref()?.get(key)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModuleValues {
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct StateValues {
    #[serde(default)]
    root_module: ModuleValues,
}

/// A decoded `show -json` document.
#[derive(Debug)]
pub struct StateDocument {
    resources: Vec<ResourceRecord>,
}

impl StateDocument {
    /// Decodes raw `show -json` stdout.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::MalformedStateError`] when the payload is not
    /// JSON, lacks the `values` root field, or has a `values` section that
    /// does not have the expected shape. The raw payload is kept in the error.
    pub fn parse(stdout: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(stdout).map_err(|e| InventoryError::MalformedStateError {
                reason: format!("output is not valid JSON: {e}"),
                payload: stdout.to_string(),
            })?;

        let Some(values) = document.get("values") else {
            return Err(InventoryError::MalformedStateError {
                reason: "missing 'values' root field".to_string(),
                payload: document.to_string(),
            });
        };

        let values: StateValues = serde_json::from_value(values.clone()).map_err(|e| {
            InventoryError::MalformedStateError {
                reason: format!("unexpected 'values' structure: {e}"),
                payload: document.to_string(),
            }
        })?;

        Ok(Self {
            resources: values.root_module.resources,
        })
    }

    /// Resources of the root module, in state order.
    #[must_use]
    pub fn resources(&self) -> &[ResourceRecord] {
        &self.resources
    }

    /// Consumes the document, returning its resources.
    #[must_use]
    pub fn into_resources(self) -> Vec<ResourceRecord> {
        self.resources
    }
}

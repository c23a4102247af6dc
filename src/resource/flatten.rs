//! Flattening of nested resource attributes into host variables
//!
//! Terraform reports attributes as arbitrary JSON trees
//! (`root_block_device: [{volume_size: 10}]`). Host variables are flat, so
//! each leaf is surfaced under its path with segments joined by `_`:
//! `root_block_device_0_volume_size = 10`.

use serde_json::Value;
use std::collections::BTreeMap;

/// Separator appended after every path segment.
const SEPARATOR: char = '_';

/// Flattens a JSON tree into `path -> scalar` pairs.
///
/// - object entries extend the path with `"<key>_"`
/// - array elements extend the path with `"<index>_"` (zero-based)
/// - scalars, `null` included, are stored under the path with one trailing
///   separator removed; a top-level scalar lands under `""`
///
/// Empty objects and arrays produce no entries. Colliding paths are resolved
/// last-write-wins in depth-first, in-order visiting order. The walk uses an
/// explicit stack, so deep trees cannot overflow the call stack.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tfstate_inventory::resource::flatten::flatten_attributes;
///
/// let flat = flatten_attributes(&json!({"a": {"b": 1}, "c": [10, 20]}));
/// assert_eq!(flat["a_b"], json!(1));
/// assert_eq!(flat["c_0"], json!(10));
/// assert_eq!(flat["c_1"], json!(20));
/// ```
#[must_use]
pub fn flatten_attributes(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    let mut stack: Vec<(String, &Value)> = vec![(String::new(), value)];

    while let Some((prefix, node)) = stack.pop() {
        match node {
            Value::Object(map) => {
                // Reverse push so entries pop in iteration order.
                for (key, child) in map.iter().rev() {
                    stack.push((format!("{prefix}{key}{SEPARATOR}"), child));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push((format!("{prefix}{index}{SEPARATOR}"), child));
                }
            }
            scalar => {
                let key = prefix.strip_suffix(SEPARATOR).unwrap_or(&prefix).to_string();
                out.insert(key, scalar.clone());
            }
        }
    }

    out
}

/// Like [`flatten_attributes`] but without `null` leaves.
///
/// This is the set of pairs that become host variables.
#[must_use]
pub fn host_variables(value: &Value) -> BTreeMap<String, Value> {
    let mut flat = flatten_attributes(value);
    flat.retain(|_, v| !v.is_null());
    flat
}

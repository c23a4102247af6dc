//! Identifier sanitization for group and variable names
//!
//! Inventory consumers only accept `[A-Za-z0-9_]` identifiers that do not
//! start with a digit. Tag keys and values are free-form (`Contact:
//! ops@example.com`, `Name: web-01`), so every group derived from a tag is
//! passed through [`sanitize_name`].

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::TAG_GROUP_PREFIX;

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_]").expect("static pattern is valid")
});

/// Maps any string to a safe identifier.
///
/// Each character outside `[A-Za-z0-9_]` becomes one `_`, and a leading digit
/// gets an `_` prefix. The function is total and idempotent.
///
/// # Examples
///
/// ```
/// use tfstate_inventory::resource::naming::sanitize_name;
///
/// assert_eq!(sanitize_name("tag_Contact_ops@example.com"), "tag_Contact_ops_example_com");
/// assert_eq!(sanitize_name("10.0.0.1"), "_10_0_0_1");
/// assert_eq!(sanitize_name(&sanitize_name("a-b")), sanitize_name("a-b"));
/// ```
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(name, "_");
    if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{replaced}")
    } else {
        replaced.into_owned()
    }
}

/// Group name for a tag pair: `sanitize_name("tag_<key>_<value>")`.
#[must_use]
pub fn group_name_for_tag(key: &str, value: &str) -> String {
    sanitize_name(&format!("{TAG_GROUP_PREFIX}_{key}_{value}"))
}

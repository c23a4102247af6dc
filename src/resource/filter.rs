//! Resource selection by type, address pattern and tag pattern
//!
//! A [`FilterCriteria`] holds three independent gates that are AND-combined.
//! Each gate that is left empty lets every resource through:
//!
//! 1. **type**: the resource type must be in the allow-list
//! 2. **address**: at least one pattern must match somewhere in the address
//! 3. **tag**: at least one `{key: pattern}` predicate must find `key` in
//!    `tags_all` and match its value
//!
//! Patterns are compiled once, when the criteria are built, so an invalid
//! expression is a configuration error rather than a per-resource failure.
//! Matching is unanchored (`Regex::is_match`), so `web` matches
//! `aws_instance.webserver`; use `^` and `$` to anchor.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::core::{InventoryError, Result};
use crate::terraform::state::ResourceRecord;

/// A `{tag key: value pattern}` predicate.
#[derive(Debug, Clone)]
pub struct TagPredicate {
    /// Tag key that must be present in `tags_all`
    pub key: String,
    /// Pattern searched in the tag value
    pub pattern: Regex,
}

impl TagPredicate {
    fn matches(&self, record: &ResourceRecord) -> bool {
        let Some(tags) = record.tags_all() else {
            return false;
        };
        match tags.get(&self.key) {
            Some(Value::String(value)) => self.pattern.is_match(value),
            Some(Value::Null) | None => false,
            Some(other) => self.pattern.is_match(&other.to_string()),
        }
    }
}

/// The active combination of resource filters.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tfstate_inventory::resource::filter::FilterCriteria;
/// use tfstate_inventory::terraform::state::ResourceRecord;
///
/// # fn example() -> tfstate_inventory::core::Result<()> {
/// let criteria = FilterCriteria::default()
///     .with_types(["aws_instance"])
///     .with_address_patterns(["web"])?;
///
/// let web = ResourceRecord::new("aws_instance", "aws_instance.web", json!({}));
/// let db = ResourceRecord::new("aws_instance", "aws_instance.db", json!({}));
/// assert!(criteria.matches(&web));
/// assert!(!criteria.matches(&db));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    type_list: BTreeSet<String>,
    address_list: Vec<Regex>,
    tag_list: Vec<TagPredicate>,
}

impl FilterCriteria {
    /// Adds resource types to the allow-list.
    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_list.extend(types.into_iter().map(Into::into));
        self
    }

    /// Compiles and appends address patterns.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] naming the first invalid regex.
    pub fn with_address_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.address_list.push(compile("address_list", pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Compiles and appends `(tag key, value pattern)` predicates.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] naming the first invalid regex.
    pub fn with_tag_patterns<I, K, P>(mut self, predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        for (key, pattern) in predicates {
            self.tag_list.push(TagPredicate {
                key: key.into(),
                pattern: compile("tag_list", pattern.as_ref())?,
            });
        }
        Ok(self)
    }

    /// Whether no gate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_list.is_empty() && self.address_list.is_empty() && self.tag_list.is_empty()
    }

    /// Evaluates the gates in order (type, address, tag), stopping at the
    /// first one that rejects.
    #[must_use]
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        if !self.type_list.is_empty() && !self.type_list.contains(&record.resource_type) {
            return false;
        }

        if !self.address_list.is_empty()
            && !self.address_list.iter().any(|re| re.is_match(&record.address))
        {
            return false;
        }

        if !self.tag_list.is_empty() && !self.tag_list.iter().any(|tag| tag.matches(record)) {
            return false;
        }

        true
    }

    /// Returns the matching records, preserving their order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [ResourceRecord]) -> Vec<&'a ResourceRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

fn compile(option: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        InventoryError::config(format!("Invalid regex '{pattern}' in {option}: {e}"))
    })
}

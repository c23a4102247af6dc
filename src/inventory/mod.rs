//! Inventory registry and its in-memory implementation
//!
//! The builder only ever talks to an [`InventoryRegistry`]: four append-only,
//! idempotent operations that mirror what a dynamic inventory host exposes.
//! [`Inventory`] is the registry the binary uses; it renders the result in
//! the JSON layout inventory scripts are expected to print for `--list` and
//! `--host`, and as a text tree for `--graph`.

pub mod builder;

pub use builder::{InventoryBuilder, PopulateSummary};

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::constants::{ALL_GROUP, UNGROUPED_GROUP};

/// Sink for hosts, groups and host variables.
///
/// Every operation is an idempotent add: registering the same host or group
/// twice, or adding the same child twice, leaves one entry.
pub trait InventoryRegistry {
    /// Registers a host.
    fn add_host(&mut self, host: &str);

    /// Registers a group.
    fn add_group(&mut self, group: &str);

    /// Makes `host` a member of `group`.
    fn add_child(&mut self, group: &str, host: &str);

    /// Sets one host variable, replacing a previous value for the same key.
    fn set_variable(&mut self, host: &str, key: &str, value: Value);
}

/// In-memory inventory.
///
/// Hosts and groups are kept sorted by name; group members keep the order in
/// which they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    hosts: BTreeMap<String, Map<String, Value>>,
    groups: BTreeMap<String, Vec<String>>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.groups.is_empty()
    }

    /// Registered host names.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Members of `group`, empty when the group is unknown.
    #[must_use]
    pub fn group_hosts(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `host` is registered.
    #[must_use]
    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// One variable of one host.
    #[must_use]
    pub fn variable(&self, host: &str, key: &str) -> Option<&Value> {
        self.hosts.get(host)?.get(key)
    }

    /// All variables of `host` as a JSON object, `{}` for unknown hosts.
    #[must_use]
    pub fn host_vars(&self, host: &str) -> Value {
        Value::Object(self.hosts.get(host).cloned().unwrap_or_default())
    }

    fn ungrouped_hosts(&self) -> Vec<&str> {
        self.hosts
            .keys()
            .filter(|host| !self.groups.values().any(|members| members.contains(*host)))
            .map(String::as_str)
            .collect()
    }

    /// Renders the `--list` document.
    ///
    /// ```json
    /// {
    ///   "_meta": {"hostvars": {"aws_instance.web": {"ansible_host": "3.144.148.143"}}},
    ///   "all": {"children": ["ungrouped", "tag_Name_web"]},
    ///   "tag_Name_web": {"hosts": ["aws_instance.web"]},
    ///   "ungrouped": {"hosts": []}
    /// }
    /// ```
    #[must_use]
    pub fn to_list_json(&self) -> Value {
        let mut document = Map::new();

        let hostvars: Map<String, Value> = self
            .hosts
            .iter()
            .map(|(host, vars)| (host.clone(), Value::Object(vars.clone())))
            .collect();
        document.insert("_meta".to_string(), json!({ "hostvars": hostvars }));

        let mut children = vec![UNGROUPED_GROUP.to_string()];
        children.extend(self.groups.keys().cloned());
        document.insert(ALL_GROUP.to_string(), json!({ "children": children }));

        document.insert(UNGROUPED_GROUP.to_string(), json!({ "hosts": self.ungrouped_hosts() }));
        for (group, members) in &self.groups {
            document.insert(group.clone(), json!({ "hosts": members }));
        }

        Value::Object(document)
    }

    /// Renders the `--graph` tree.
    ///
    /// ```text
    /// @all:
    ///   |--@ungrouped:
    ///   |--@tag_Name_web:
    ///   |  |--aws_instance.web
    /// ```
    #[must_use]
    pub fn graph(&self) -> String {
        let mut out = format!("@{ALL_GROUP}:\n");
        let ungrouped = self.ungrouped_hosts();

        let grouped = self.groups.iter().map(|(group, members)| {
            (group.as_str(), members.iter().map(String::as_str).collect::<Vec<_>>())
        });
        let sections = std::iter::once((UNGROUPED_GROUP, ungrouped)).chain(grouped);
        for (group, members) in sections {
            let _ = writeln!(out, "  |--@{group}:");
            for host in members {
                let _ = writeln!(out, "  |  |--{host}");
            }
        }
        out
    }
}

impl InventoryRegistry for Inventory {
    fn add_host(&mut self, host: &str) {
        self.hosts.entry(host.to_string()).or_default();
    }

    fn add_group(&mut self, group: &str) {
        self.groups.entry(group.to_string()).or_default();
    }

    fn add_child(&mut self, group: &str, host: &str) {
        self.add_host(host);
        let members = self.groups.entry(group.to_string()).or_default();
        if !members.iter().any(|member| member == host) {
            members.push(host.to_string());
        }
    }

    fn set_variable(&mut self, host: &str, key: &str, value: Value) {
        self.hosts.entry(host.to_string()).or_default().insert(key.to_string(), value);
    }
}

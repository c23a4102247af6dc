//! Inventory source configuration
//!
//! An inventory source is a YAML (or JSON) file such as:
//!
//! ```yaml
//! plugin: tfstate_inventory
//! project_path:
//!   - ./infra/prod
//!   - git: https://github.com/example/infra.git
//!     remote_state:
//!       type: s3
//!       bucket: tf-state
//!       key: prod/terraform.tfstate
//!       region: us-east-1
//! type_list: aws_instance
//! address_list:
//!   - "^aws_instance\\.web"
//! tag_list:
//!   - Env: "^prod$"
//! access_param: [public_ip, private_ip]
//! binary_path: ~/bin/terraform
//! command_timeout: 300
//! ```
//!
//! Loading happens in two steps. The file is first deserialized into the
//! permissive [`ConfigFile`] model (string-or-list shorthands, untagged
//! workspace entries), then validated into an [`InventoryConfig`]: regexes are
//! compiled, workspace entries are checked for `path` XOR `git`, remote-state
//! parameters are rendered to strings. Every problem found on the way is an
//! [`InventoryError::ConfigurationError`], reported before any workspace runs.
//!
//! # Modules
//!
//! - `parser` - YAML/JSON reading with file context

pub mod parser;

pub use parser::{parse_config, parse_config_str};

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{DEFAULT_ACCESS_PARAM, REMOTE_STATE_TYPE_KEY};
use crate::core::{InventoryError, Result};
use crate::resource::filter::FilterCriteria;
use crate::utils::platform::resolve_path;

/// Backend types end up in a file name and an HCL string literal.
static BACKEND_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern is valid"));

/// A value that may be written either as a single item or as a list.
///
/// `Many` is tried first: derived structs also deserialize from a sequence,
/// so `[a, b]` would otherwise be read as one positional struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// `key: [value, ...]`
    Many(Vec<T>),
    /// `key: value`
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    /// Normalizes to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// One `project_path` entry as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkspaceEntry {
    /// Bare string, shorthand for `{ path: <string> }`
    Path(String),
    /// Mapping form
    Detailed(DetailedWorkspace),
}

/// Mapping form of a `project_path` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedWorkspace {
    /// Local directory
    #[serde(default)]
    pub path: Option<String>,

    /// Repository URL to clone
    #[serde(default, alias = "source")]
    pub git: Option<String>,

    /// Backend `type` plus backend parameters, in file order
    #[serde(default)]
    pub remote_state: Option<serde_yaml::Mapping>,
}

/// Raw configuration file model.
///
/// Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Inventory plugin name; accepted for file-format compatibility, unused
    #[serde(default)]
    pub plugin: Option<String>,

    /// Workspaces to read, in order
    #[serde(default)]
    pub project_path: Option<OneOrMany<WorkspaceEntry>>,

    /// Resource type allow-list
    #[serde(default)]
    pub type_list: OneOrMany<String>,

    /// Address regex allow-list
    #[serde(default)]
    pub address_list: OneOrMany<String>,

    /// `{tag key: value regex}` predicates, one key per entry
    #[serde(default)]
    pub tag_list: Vec<BTreeMap<String, String>>,

    /// Attribute keys tried in order for `ansible_host`
    #[serde(default)]
    pub access_param: Option<OneOrMany<String>>,

    /// Terraform executable
    #[serde(default)]
    pub binary_path: Option<String>,

    /// Per-subprocess timeout in seconds
    #[serde(default)]
    pub command_timeout: Option<u64>,
}

/// Remote state backend settings for one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteState {
    /// Backend type, e.g. `s3` or `gcs`
    pub backend_type: String,
    /// Backend parameters other than `type`, rendered to strings, in the
    /// order they were written
    pub params: Vec<(String, String)>,
}

impl RemoteState {
    /// Creates remote state settings with no parameters.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] when `backend_type` is not a
    /// plain identifier.
    pub fn new(backend_type: impl Into<String>) -> Result<Self> {
        let backend_type = backend_type.into();
        if !BACKEND_TYPE.is_match(&backend_type) {
            return Err(InventoryError::config(format!(
                "remote_state type '{backend_type}' must only contain letters, digits, '_' and '-'"
            )));
        }
        Ok(Self {
            backend_type,
            params: Vec::new(),
        })
    }

    /// Adds one backend parameter, replacing an earlier value for `key` in
    /// place.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(key.into(), value.into());
        self
    }

    fn set_param(&mut self, key: String, value: String) {
        match self.params.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((key, value)),
        }
    }

    /// Builds remote state settings from the configuration mapping.
    ///
    /// Parameters keep the order of the mapping. Scalar parameters are
    /// rendered as text (`true`, `3`, `""` for null).
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] when `type` is missing or not a
    /// plain identifier, or when a key is not a string or a parameter is a
    /// list or mapping.
    pub fn from_mapping(mapping: serde_yaml::Mapping) -> Result<Self> {
        let backend_type = match mapping.get(REMOTE_STATE_TYPE_KEY) {
            Some(serde_yaml::Value::String(kind)) => kind.clone(),
            Some(_) => {
                return Err(InventoryError::config("remote_state 'type' must be a string"));
            }
            None => {
                return Err(InventoryError::config("remote_state requires a 'type' key"));
            }
        };

        let mut state = Self::new(backend_type)?;
        for (key, value) in mapping {
            let serde_yaml::Value::String(key) = key else {
                return Err(InventoryError::config("remote_state keys must be strings"));
            };
            if key == REMOTE_STATE_TYPE_KEY {
                continue;
            }
            let rendered = render_scalar(&value).ok_or_else(|| {
                InventoryError::config(format!(
                    "remote_state parameter '{key}' must be a scalar value"
                ))
            })?;
            state.set_param(key, rendered);
        }
        Ok(state)
    }

    /// `key=value` pairs in parameter order, one per `-backend-config` option.
    pub fn backend_config_pairs(&self) -> impl Iterator<Item = String> + '_ {
        self.params.iter().map(|(key, value)| format!("{key}={value}"))
    }
}

fn render_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_)
        | serde_yaml::Value::Tagged(_) => None,
    }
}

/// Where a workspace lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceLocation {
    /// An existing local directory, used in place
    Path(PathBuf),
    /// A repository URL, cloned into a temporary directory
    Git(String),
}

/// One validated workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSpec {
    /// Local directory or repository
    pub location: WorkspaceLocation,
    /// Backend configuration applied before `init`
    pub remote_state: Option<RemoteState>,
}

impl WorkspaceSpec {
    /// A local directory workspace.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            location: WorkspaceLocation::Path(path.into()),
            remote_state: None,
        }
    }

    /// A repository workspace.
    #[must_use]
    pub fn git(url: impl Into<String>) -> Self {
        Self {
            location: WorkspaceLocation::Git(url.into()),
            remote_state: None,
        }
    }

    /// Attaches remote state settings.
    #[must_use]
    pub fn with_remote_state(mut self, remote_state: RemoteState) -> Self {
        self.remote_state = Some(remote_state);
        self
    }

    /// The local directory, if this is a path workspace.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            WorkspaceLocation::Path(path) => Some(path),
            WorkspaceLocation::Git(_) => None,
        }
    }

    /// The repository URL, if this is a git workspace.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match &self.location {
            WorkspaceLocation::Git(url) => Some(url),
            WorkspaceLocation::Path(_) => None,
        }
    }

    fn from_entry(index: usize, entry: WorkspaceEntry) -> Result<Self> {
        let detailed = match entry {
            WorkspaceEntry::Path(path) => DetailedWorkspace {
                path: Some(path),
                git: None,
                remote_state: None,
            },
            WorkspaceEntry::Detailed(detailed) => detailed,
        };

        let location = match (detailed.path, detailed.git) {
            (Some(_), Some(_)) => {
                return Err(InventoryError::config(format!(
                    "project_path entry {index} sets both 'path' and 'git'; exactly one is allowed"
                )));
            }
            (None, None) => {
                return Err(InventoryError::config(format!(
                    "project_path entry {index} needs either 'path' or 'git'"
                )));
            }
            (Some(path), None) => {
                if path.trim().is_empty() {
                    return Err(InventoryError::config(format!(
                        "project_path entry {index} has an empty 'path'"
                    )));
                }
                WorkspaceLocation::Path(resolve_path(&path)?)
            }
            (None, Some(url)) => {
                if url.trim().is_empty() {
                    return Err(InventoryError::config(format!(
                        "project_path entry {index} has an empty 'git' source"
                    )));
                }
                WorkspaceLocation::Git(url)
            }
        };

        let remote_state = detailed.remote_state.map(RemoteState::from_mapping).transpose()?;

        Ok(Self {
            location,
            remote_state,
        })
    }
}

impl fmt::Display for WorkspaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            WorkspaceLocation::Path(path) => write!(f, "{}", path.display()),
            WorkspaceLocation::Git(url) => write!(f, "{url}"),
        }
    }
}

/// Validated inventory configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Workspaces, processed in this order
    pub workspaces: Vec<WorkspaceSpec>,
    /// Compiled resource filters
    pub filter: FilterCriteria,
    /// Attribute keys tried in order for `ansible_host`
    pub access_params: Vec<String>,
    /// Configured terraform executable, `None` to search `PATH`
    pub binary_path: Option<String>,
    /// Bound on every subprocess, `None` to wait indefinitely
    pub command_timeout: Option<Duration>,
}

impl InventoryConfig {
    /// Configuration for the given workspaces with every other option at its
    /// default.
    #[must_use]
    pub fn new(workspaces: Vec<WorkspaceSpec>) -> Self {
        Self {
            workspaces,
            filter: FilterCriteria::default(),
            access_params: default_access_params(),
            binary_path: None,
            command_timeout: None,
        }
    }

    /// Parses and validates configuration text (YAML or JSON).
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] for any syntax, shape or
    /// validation problem.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = parse_config_str(content, "<inline>")?;
        Self::try_from(file)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ConfigurationError`] when the file cannot be read or
    /// fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let file: ConfigFile = parse_config(path).await?;
        let config = Self::try_from(file)?;
        tracing::debug!(
            target: "config",
            "Loaded {} with {} workspace(s)",
            path.display(),
            config.workspaces.len()
        );
        Ok(config)
    }
}

fn default_access_params() -> Vec<String> {
    vec![DEFAULT_ACCESS_PARAM.to_string()]
}

impl TryFrom<ConfigFile> for InventoryConfig {
    type Error = InventoryError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let entries = file
            .project_path
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if entries.is_empty() {
            return Err(InventoryError::config(
                "project_path is required and must list at least one workspace",
            ));
        }
        let workspaces = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| WorkspaceSpec::from_entry(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let mut tag_predicates = Vec::new();
        for (index, predicate) in file.tag_list.into_iter().enumerate() {
            if predicate.len() != 1 {
                return Err(InventoryError::config(format!(
                    "tag_list entry {index} must map exactly one tag key to a regex, found {} keys",
                    predicate.len()
                )));
            }
            tag_predicates.extend(predicate);
        }

        let filter = FilterCriteria::default()
            .with_types(file.type_list.into_vec())
            .with_address_patterns(file.address_list.into_vec())?
            .with_tag_patterns(tag_predicates)?;

        let access_params = match file.access_param {
            Some(params) => {
                let params = params.into_vec();
                if params.is_empty() || params.iter().any(|p| p.trim().is_empty()) {
                    return Err(InventoryError::config(
                        "access_param must name at least one non-empty attribute",
                    ));
                }
                params
            }
            None => default_access_params(),
        };

        if matches!(file.binary_path.as_deref(), Some(path) if path.trim().is_empty()) {
            return Err(InventoryError::config("binary_path must not be empty"));
        }

        let command_timeout = match file.command_timeout {
            Some(0) => {
                return Err(InventoryError::config("command_timeout must be at least 1 second"));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            workspaces,
            filter,
            access_params,
            binary_path: file.binary_path,
            command_timeout,
        })
    }
}

//! Global constants used throughout the tfstate-inventory codebase.
//!
//! Names of external commands, default option values and the fixed
//! identifiers that appear in generated inventories live here so they are
//! not scattered across modules as magic strings.

/// Executable looked up on `PATH` when `binary_path` is not configured.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Attribute used for `ansible_host` when `access_param` is not configured.
pub const DEFAULT_ACCESS_PARAM: &str = "public_ip";

/// Host variable holding the primary connection address.
pub const ANSIBLE_HOST_VAR: &str = "ansible_host";

/// Attribute of a resource's `values` holding its effective tags.
pub const TAGS_ALL_KEY: &str = "tags_all";

/// Prefix of every tag-derived group name (`tag_<key>_<value>`).
pub const TAG_GROUP_PREFIX: &str = "tag";

/// Key of the `remote_state` mapping naming the backend type.
pub const REMOTE_STATE_TYPE_KEY: &str = "type";

/// Default configuration file consulted by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "inventory.tf.yml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV_VAR: &str = "TFSTATE_INVENTORY_CONFIG";

/// Prefix for temporary checkout directories.
pub const CHECKOUT_DIR_PREFIX: &str = "checkout";

/// Group containing every group in rendered inventories.
pub const ALL_GROUP: &str = "all";

/// Group holding hosts that belong to no other group.
pub const UNGROUPED_GROUP: &str = "ungrouped";

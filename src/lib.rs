//! tfstate-inventory - dynamic inventory from terraform state
//!
//! Reads the current state of one or more terraform workspaces and turns the
//! resources in it into inventory hosts, host variables and tag groups.
//!
//! # Architecture Overview
//!
//! For every configured workspace, in order:
//!
//! 1. **Resolve** the workspace: a local directory, or a fresh `git clone`
//!    into a temporary directory removed afterwards ([`workspace`], [`git`])
//! 2. **Init** it with `terraform init`, writing a backend declaration and
//!    passing `-backend-config` pairs when remote state is configured
//!    ([`terraform`])
//! 3. **Show** its state with `terraform show -json` ([`terraform::state`])
//! 4. **Filter** resources by type, address regex and tag regex
//!    ([`resource::filter`])
//! 5. **Populate** the inventory: one host per matching resource, its
//!    flattened attributes as host variables, one group per tag
//!    ([`inventory`], [`resource::flatten`], [`resource::naming`])
//!
//! # Core Modules
//!
//! - [`cli`] - dynamic inventory script interface (`--list`, `--host`, `--graph`)
//! - [`config`] - inventory source file parsing and validation
//! - [`core`] - error types and user-facing error rendering
//! - [`inventory`] - registry trait, in-memory inventory and the pipeline driver
//!
//! ## External Tools
//! - [`command`] - subprocess execution with captured output and timeouts
//! - [`git`] - repository checkout
//! - [`terraform`] - `init` and `show -json`
//! - [`workspace`] - workspace resolution and checkout lifetime
//!
//! ## Supporting Modules
//! - [`constants`] - fixed names and defaults
//! - [`resource`] - filtering, flattening and name sanitization
//! - [`utils`] - executable lookup, path expansion, temporary directories
//!
//! # Inventory Source Example
//!
//! ```yaml
//! plugin: tfstate_inventory
//! project_path:
//!   - ./infra
//! type_list: aws_instance
//! access_param: [public_ip, private_ip]
//! ```
//!
//! ```bash
//! tfstate-inventory --config inventory.tf.yml --list
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod inventory;
pub mod resource;
pub mod terraform;
pub mod utils;
pub mod workspace;

#[cfg(test)]
pub mod test_utils;

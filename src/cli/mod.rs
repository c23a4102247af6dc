//! Command-line interface
//!
//! The binary is a dynamic inventory script. Inventory consumers call it as
//!
//! ```bash
//! tfstate-inventory --list            # whole inventory as JSON (default)
//! tfstate-inventory --host web-01     # variables of one host as JSON
//! tfstate-inventory --graph           # group tree, for humans
//! ```
//!
//! The inventory source file comes from `--config`, the
//! `TFSTATE_INVENTORY_CONFIG` environment variable, or `inventory.tf.yml` in
//! the working directory, in that order.
//!
//! Only the inventory itself is written to stdout. Logs go to stderr: warnings
//! by default, debug output with `--verbose`, nothing with `--quiet`.
//! `RUST_LOG` overrides all of these.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::InventoryConfig;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::inventory::{Inventory, InventoryBuilder};

/// What the invocation should print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Full inventory document
    List,
    /// Variables of one host
    Host(String),
    /// Group tree
    Graph,
}

/// Dynamic inventory built from terraform state.
#[derive(Debug, Parser)]
#[command(
    name = "tfstate-inventory",
    about = "Build a dynamic inventory from terraform state",
    version,
    long_about = "Runs `terraform init` and `terraform show -json` in each configured workspace \
                  and turns the matching resources into inventory hosts, grouped by their tags."
)]
#[command(group(ArgGroup::new("mode").args(["list", "host", "graph"])))]
pub struct Cli {
    /// Print the whole inventory (default)
    #[arg(long)]
    list: bool,

    /// Print the variables of one host
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Print the group tree
    #[arg(long)]
    graph: bool,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Inventory source file (YAML or JSON)
    #[arg(short, long, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// The requested output.
    #[must_use]
    pub fn mode(&self) -> OutputMode {
        if let Some(host) = &self.host {
            OutputMode::Host(host.clone())
        } else if self.graph {
            OutputMode::Graph
        } else {
            OutputMode::List
        }
    }

    /// The inventory source file.
    #[must_use]
    pub fn config_path(&self) -> &std::path::Path {
        &self.config
    }

    /// Default log filter when `RUST_LOG` is not set; `None` disables logging.
    #[must_use]
    pub const fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            None
        } else if self.verbose {
            Some("debug")
        } else {
            Some("warn")
        }
    }

    fn init_logging(&self) {
        let filter = match (std::env::var("RUST_LOG").is_ok(), self.log_level()) {
            (true, _) => EnvFilter::from_default_env(),
            (false, Some(level)) => EnvFilter::new(level),
            (false, None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(true)
            .try_init();
    }

    /// Builds the inventory and renders the requested output.
    ///
    /// # Errors
    ///
    /// Any configuration, workspace, terraform or state error, with the
    /// inventory source path attached as context.
    pub async fn run(&self) -> Result<String> {
        let config = InventoryConfig::load(&self.config)
            .await
            .with_context(|| format!("Failed to load inventory source {}", self.config.display()))?;

        let builder = InventoryBuilder::new(config)?;
        let mut inventory = Inventory::new();
        let summary = builder.populate(&mut inventory).await?;
        tracing::info!(
            target: "inventory",
            "{} workspace(s): {} resource(s) seen, {} matched, {} host(s) added, {} skipped",
            summary.workspaces,
            summary.resources_seen,
            summary.resources_matched,
            summary.hosts_added,
            summary.resources_skipped
        );

        self.render(&inventory)
    }

    /// Renders `inventory` for the requested mode.
    ///
    /// # Errors
    ///
    /// Only if JSON serialization fails.
    pub fn render(&self, inventory: &Inventory) -> Result<String> {
        let document = match self.mode() {
            OutputMode::Graph => return Ok(inventory.graph()),
            OutputMode::Host(host) => inventory.host_vars(&host),
            OutputMode::List => inventory.to_list_json(),
        };

        let text = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    /// Entry point used by `main`: sets up logging, runs, prints to stdout.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn execute(self) -> Result<()> {
        self.init_logging();
        let output = self.run().await?;
        if output.ends_with('\n') {
            print!("{output}");
        } else {
            println!("{output}");
        }
        Ok(())
    }
}

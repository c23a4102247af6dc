//! tfstate-inventory entry point
//!
//! Parses arguments, builds the inventory and prints it. Errors are rendered
//! with context and suggestions on stderr, and the process exits with 1.

use anyhow::Result;
use clap::Parser;
use tfstate_inventory::cli;
use tfstate_inventory::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

//! Common test utilities for tfstate-inventory integration tests
//!
//! [`TestProject`] owns a scratch directory holding a workspace, an inventory
//! source file and a scripted `terraform` replacement, and hands out
//! `assert_cmd` commands preconfigured to run the binary against them.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch project for one integration test.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    /// Creates the project with an empty `workspace/` directory.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        fs::create_dir_all(temp.path().join("workspace"))?;
        Ok(Self {
            temp,
        })
    }

    /// Project root
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The default workspace directory
    pub fn workspace(&self) -> PathBuf {
        self.root().join("workspace")
    }

    /// Path of the fake terraform script
    pub fn terraform(&self) -> PathBuf {
        self.root().join("bin").join("terraform")
    }

    /// Installs a fake terraform whose `show` prints `state` (or the
    /// workspace's own `state.json`) and whose `init` exits with `init_exit`.
    pub fn install_terraform(&self, state: &str, init_exit: i32) -> Result<PathBuf> {
        let bin = self.root().join("bin");
        fs::create_dir_all(&bin)?;
        fs::write(bin.join("show.json"), state)?;

        let script = format!(
            r#"#!/bin/sh
bin='{bin}'
echo "$@" >> "$bin/invocations.log"
case "$1" in
    init)
        echo "Initializing the backend..."
        [ {init_exit} -eq 0 ] || echo "Error: Failed to get existing workspaces" >&2
        exit {init_exit}
        ;;
    show)
        if [ -f state.json ]; then cat state.json; else cat "$bin/show.json"; fi
        ;;
esac
"#,
            bin = bin.display(),
        );
        let path = self.terraform();
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Creates another workspace directory whose `show` output is `state`
    /// instead of the project-wide one
    pub fn add_workspace(&self, name: &str, state: &Value) -> Result<PathBuf> {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("state.json"), state.to_string())?;
        Ok(dir)
    }

    /// Installs a fake terraform printing `state` as JSON
    pub fn install_state(&self, state: &Value) -> Result<PathBuf> {
        self.install_terraform(&state.to_string(), 0)
    }

    /// Lines of `terraform` arguments recorded so far
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.root().join("bin").join("invocations.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Writes `inventory.tf.yml` and returns its path
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        let path = self.root().join("inventory.tf.yml");
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Inventory source pointing at the default workspace and fake terraform,
    /// followed by `extra` YAML lines
    pub fn write_default_config(&self, extra: &str) -> Result<PathBuf> {
        self.write_config(&format!(
            "plugin: tfstate_inventory\nproject_path:\n  - {}\nbinary_path: {}\n{extra}",
            self.workspace().display(),
            self.terraform().display()
        ))
    }

    /// The binary, run from the project root with a clean environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tfstate-inventory").unwrap();
        cmd.current_dir(self.root()).env_remove("TFSTATE_INVENTORY_CONFIG").env_remove("RUST_LOG");
        cmd
    }
}

/// State with two tagged instances and one subnet
pub fn sample_state() -> Value {
    serde_json::json!({
        "format_version": "1.0",
        "terraform_version": "1.5.7",
        "values": {"root_module": {"resources": [
            {
                "address": "aws_instance.webserver",
                "mode": "managed",
                "type": "aws_instance",
                "name": "webserver",
                "values": {
                    "ami": "ami-0e83be366243f524a",
                    "public_ip": "3.144.148.143",
                    "private_ip": "10.0.1.20",
                    "host_id": null,
                    "root_block_device": [{"volume_size": 8, "volume_type": "gp2"}],
                    "tags_all": {"Name": "webserver-tf", "Contact": "ops@example.com"}
                }
            },
            {
                "address": "aws_instance.dbserver",
                "mode": "managed",
                "type": "aws_instance",
                "name": "dbserver",
                "values": {
                    "public_ip": "18.191.55.12",
                    "tags_all": {"Name": "dbserver-tf", "AlwaysUp": false}
                }
            },
            {
                "address": "aws_subnet.main",
                "mode": "managed",
                "type": "aws_subnet",
                "name": "main",
                "values": {"cidr_block": "10.0.1.0/24", "tags_all": {"Name": "main"}}
            }
        ]}}
    })
}

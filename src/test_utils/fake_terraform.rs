//! Scripted stand-in for the terraform executable
//!
//! [`FakeTerraform`] writes a small POSIX shell script into a temporary
//! directory. The script appends every invocation (working directory plus
//! arguments) to a log, snapshots the working directory listing when `init`
//! runs, prints a canned state document for `show`, and exits with the
//! configured codes. Tests point `binary_path` (or [`TerraformCli`]) at it.
//!
//! [`TerraformCli`]: crate::terraform::TerraformCli

use anyhow::{Context, Result};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// One recorded call of the fake binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Working directory the call ran in
    pub cwd: PathBuf,
    /// Arguments, in order
    pub args: Vec<String>,
}

/// Builder for [`FakeTerraform`].
#[derive(Debug, Clone)]
pub struct FakeTerraformBuilder {
    show_output: String,
    stderr: String,
    init_exit_code: i32,
    show_exit_code: i32,
    show_delay_secs: u32,
}

impl FakeTerraformBuilder {
    /// Raw stdout printed by `show`
    pub fn show_output(mut self, output: impl Into<String>) -> Self {
        self.show_output = output.into();
        self
    }

    /// State document printed by `show`
    pub fn state(self, state: &serde_json::Value) -> Self {
        self.show_output(state.to_string())
    }

    /// Text printed to stderr by every call
    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Exit code of `init`
    pub fn init_exit_code(mut self, code: i32) -> Self {
        self.init_exit_code = code;
        self
    }

    /// Exit code of `show`
    pub fn show_exit_code(mut self, code: i32) -> Self {
        self.show_exit_code = code;
        self
    }

    /// Makes `show` sleep before answering
    pub fn show_delay_secs(mut self, secs: u32) -> Self {
        self.show_delay_secs = secs;
        self
    }

    /// Writes the script and its fixtures.
    pub fn build(self) -> Result<FakeTerraform> {
        let dir = tempfile::tempdir().context("Failed to create fake terraform directory")?;
        let root = dir.path().to_path_buf();
        let script_path = root.join("terraform");
        let log_path = root.join("invocations.log");
        let init_listing_path = root.join("init_listing.txt");

        std::fs::write(root.join("show.json"), &self.show_output)?;
        std::fs::write(root.join("stderr.txt"), &self.stderr)?;

        let script = format!(
            r#"#!/bin/sh
root='{root}'
printf '%s' "$(pwd)" >> "$root/invocations.log"
for arg in "$@"; do
    printf '\t%s' "$arg" >> "$root/invocations.log"
done
printf '\n' >> "$root/invocations.log"
cat "$root/stderr.txt" >&2
case "$1" in
    init)
        ls -1A > "$root/init_listing.txt"
        exit {init_exit}
        ;;
    show)
        sleep {delay}
        cat "$root/show.json"
        exit {show_exit}
        ;;
esac
echo "unexpected command: $1" >&2
exit 64
"#,
            root = root.display(),
            init_exit = self.init_exit_code,
            show_exit = self.show_exit_code,
            delay = self.show_delay_secs,
        );
        std::fs::write(&script_path, script)?;
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))?;

        Ok(FakeTerraform {
            _dir: dir,
            script_path,
            log_path,
            init_listing_path,
        })
    }
}

/// A fake terraform binary living in its own temporary directory.
pub struct FakeTerraform {
    _dir: tempfile::TempDir,
    script_path: PathBuf,
    log_path: PathBuf,
    init_listing_path: PathBuf,
}

impl FakeTerraform {
    /// Starts a builder: `init` succeeds, `show` prints an empty state.
    pub fn builder() -> FakeTerraformBuilder {
        FakeTerraformBuilder {
            show_output: r#"{"format_version":"1.0","values":{}}"#.to_string(),
            stderr: String::new(),
            init_exit_code: 0,
            show_exit_code: 0,
            show_delay_secs: 0,
        }
    }

    /// A fake whose `show` prints `state`.
    pub fn with_state(state: &serde_json::Value) -> Result<Self> {
        Self::builder().state(state).build()
    }

    /// Path of the executable script
    pub fn path(&self) -> &Path {
        &self.script_path
    }

    /// Every recorded call, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        let Ok(log) = std::fs::read_to_string(&self.log_path) else {
            return Vec::new();
        };
        log.lines()
            .map(|line| {
                let mut fields = line.split('\t');
                let cwd = PathBuf::from(fields.next().unwrap_or_default());
                Invocation {
                    cwd,
                    args: fields.map(str::to_string).collect(),
                }
            })
            .collect()
    }

    /// Arguments of every recorded call
    pub fn recorded_args(&self) -> Vec<Vec<String>> {
        self.invocations().into_iter().map(|i| i.args).collect()
    }

    /// Directory entries present in the working directory when `init` last ran
    pub fn init_listing(&self) -> Vec<String> {
        std::fs::read_to_string(&self.init_listing_path)
            .map(|listing| listing.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

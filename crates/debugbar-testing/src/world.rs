//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated Laravel-like project with `storage/debugbar`
//! - Writing snapshots and copying samples into it
//! - Executing CLI commands with proper context

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use debugbar_sdk::Client;

use crate::fixtures::{SampleFiles, SnapshotBuilder, set_mtime};

/// Environment variables that would leak the developer's setup into tests.
const ISOLATED_ENV: &[&str] = &["DEBUGBAR_PATH", "DEBUGBAR_MCP_ERROR_LOG", "RUST_LOG"];

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use debugbar_testing::{SnapshotBuilder, TestWorld};
///
/// let world = TestWorld::new();
/// world.add_snapshot(SnapshotBuilder::new("abc123").utime(1_714_557_600.0)).unwrap();
///
/// let result = world.run(&["tree"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    debugbar_dir: PathBuf,
    error_log: PathBuf,
    env_vars: HashMap<String, String>,
    samples: SampleFiles,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment with an empty `storage/debugbar`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let debugbar_dir = base_path.join("storage").join("debugbar");
        let error_log = base_path.join("logs").join("error.log");

        std::fs::create_dir_all(&debugbar_dir).expect("Failed to create debugbar dir");

        Self {
            cwd: base_path,
            temp_dir,
            debugbar_dir,
            error_log,
            env_vars: HashMap::new(),
            samples: SampleFiles::new(),
        }
    }

    /// Remove the snapshot directory, as in a project where Debugbar never ran.
    pub fn without_debugbar_dir(self) -> Self {
        std::fs::remove_dir_all(&self.debugbar_dir).expect("Failed to remove debugbar dir");
        self
    }

    /// Get the snapshot directory path (`storage/debugbar`).
    pub fn debugbar_dir(&self) -> &Path {
        &self.debugbar_dir
    }

    /// Get the error log path passed to the CLI.
    pub fn error_log(&self) -> &Path {
        &self.error_log
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// SDK client over this world's snapshot directory.
    pub fn client(&self) -> Client {
        Client::open(&self.debugbar_dir)
    }

    /// Write a snapshot into the snapshot directory.
    pub fn add_snapshot(&self, snapshot: SnapshotBuilder) -> Result<PathBuf> {
        snapshot.write_to(&self.debugbar_dir)
    }

    /// Copy a sample snapshot into the snapshot directory as `<__meta.id>.json`
    /// with a fixed mtime.
    pub fn copy_sample(&self, sample_name: &str, mtime: i64) -> Result<PathBuf> {
        let id = self.samples.snapshot_id(sample_name)?;
        let dest = self.debugbar_dir.join(format!("{id}.json"));
        self.samples.copy_to(sample_name, &dest)?;
        set_mtime(&dest, mtime)?;
        Ok(dest)
    }

    /// Names of snapshot files currently in the directory, sorted.
    pub fn snapshot_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.debugbar_dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Contents of the error log, or an empty string if nothing was logged.
    pub fn read_error_log(&self) -> String {
        std::fs::read_to_string(&self.error_log).unwrap_or_default()
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller must provide the base command (e.g., from `cargo_bin_cmd!("debugbar-mcp")`).
    /// This method configures it with the appropriate dir, error log, cwd, and env vars.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--dir")
            .arg(self.debugbar_dir())
            .arg("--error-log")
            .arg(self.error_log());

        // Set CWD for the command
        cmd.current_dir(&self.cwd);

        for key in ISOLATED_ENV {
            cmd.env_remove(key);
        }

        // Apply environment variables
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute a command using the project's binary and return the result.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built and the `CARGO_BIN_EXE_` environment variable to be set (which
    /// cargo test does automatically).
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_stdin(args, "")
    }

    /// Execute a command feeding `stdin` to it, e.g. JSON-RPC lines for `serve`.
    #[allow(deprecated)]
    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Result<CliResult> {
        // Find the binary using cargo_bin
        let mut cmd = Command::cargo_bin("debugbar-mcp")
            .map_err(|e| anyhow::anyhow!("Failed to find debugbar-mcp binary: {}", e))?;

        // Configure with test environment settings
        self.configure_command(&mut cmd);

        cmd.args(args);
        cmd.write_stdin(stdin.to_string());

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Parse each non-empty stdout line as JSON (MCP responses).
    pub fn json_lines(&self) -> Result<Vec<serde_json::Value>> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect()
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

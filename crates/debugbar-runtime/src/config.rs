use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "debugbar-mcp.toml";

/// Log filter used when neither the flag, `RUST_LOG` nor the config set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

const DEFAULT_DEBUGBAR_DIR: &str = "storage/debugbar";
const DEFAULT_ERROR_LOG: &str = "error.log";

/// Resolve the snapshot directory based on priority:
/// 1. Explicit path (`--dir`)
/// 2. `DEBUGBAR_PATH` environment value, passed in by the caller
/// 3. `debugbar_dir` from the config file
/// 4. `<cwd>/storage/debugbar`
///
/// Relative paths resolve against `cwd`; a leading `~/` expands to the home directory.
pub fn resolve_debugbar_dir(
    explicit: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
    cwd: &Path,
) -> PathBuf {
    let chosen = explicit
        .or(env_value)
        .or(config.debugbar_dir.as_deref())
        .unwrap_or(DEFAULT_DEBUGBAR_DIR);
    cwd.join(expand_tilde(chosen))
}

/// Resolve the error log path: explicit, then `DEBUGBAR_MCP_ERROR_LOG`, then
/// `error_log` from the config, then `error.log` beside the executable (or in
/// `cwd` when the executable location is unknown).
pub fn resolve_error_log(
    explicit: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
    cwd: &Path,
    exe_dir: Option<&Path>,
) -> PathBuf {
    match explicit.or(env_value).or(config.error_log.as_deref()) {
        Some(path) => cwd.join(expand_tilde(path)),
        None => exe_dir.unwrap_or(cwd).join(DEFAULT_ERROR_LOG),
    }
}

/// Tracing filter directive: explicit, then `RUST_LOG`, then config, then [`DEFAULT_LOG_FILTER`].
pub fn resolve_log_filter(
    explicit: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
) -> String {
    explicit
        .or(env_value)
        .or(config.log_level.as_deref())
        .filter(|level| !level.trim().is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER)
        .to_string()
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Fallback limits applied when a tool call omits `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub tree_limit: usize,
    pub logs_limit: usize,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            tree_limit: 50,
            logs_limit: 10,
        }
    }
}

/// Contents of `debugbar-mcp.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debugbar_dir: Option<String>,
    pub error_log: Option<String>,
    pub log_level: Option<String>,
    pub defaults: ToolDefaults,
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path(cwd: &Path) -> PathBuf {
        cwd.join(CONFIG_FILE_NAME)
    }
}

/// Resolved settings handed to the SDK client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub debugbar_dir: PathBuf,
    pub defaults: ToolDefaults,
}

impl RuntimeConfig {
    pub fn new(debugbar_dir: impl Into<PathBuf>) -> Self {
        Self {
            debugbar_dir: debugbar_dir.into(),
            defaults: ToolDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ToolDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

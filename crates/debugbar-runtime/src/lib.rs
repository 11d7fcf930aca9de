pub mod config;
pub mod error;
pub mod storage;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_LOG_FILTER, RuntimeConfig, ToolDefaults, expand_tilde,
    resolve_debugbar_dir, resolve_error_log, resolve_log_filter,
};
pub use error::{Error, Result};
pub use storage::LogDirectory;

//! Tracing setup. Everything goes to the error log file; stdout carries
//! JSON-RPC (or command output) and must never receive log lines.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use debugbar_runtime::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `error_log`.
///
/// When the file cannot be opened, logs fall back to stderr, which MCP
/// clients treat as free-form diagnostics.
pub fn init(error_log: &Path, filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter '{}': {}", filter, e);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    let installed = match open_log_file(error_log) {
        Ok(file) => builder.with_writer(Mutex::new(file)).try_init(),
        Err(e) => {
            eprintln!(
                "Warning: cannot open error log {}: {}",
                error_log.display(),
                e
            );
            builder.with_writer(std::io::stderr).try_init()
        }
    };

    if let Err(e) = installed {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Record panics in the error log before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();

        tracing::error!("panic at {}: {}", location, message);
        default_hook(info);
    }));
}

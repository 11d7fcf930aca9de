use super::args::{Cli, Commands};
use super::handlers;
use crate::logging;
use anyhow::{Result, bail};
use debugbar_runtime::{
    Config, RuntimeConfig, resolve_debugbar_dir, resolve_error_log, resolve_log_filter,
};
use debugbar_sdk::Client;
use std::path::{Path, PathBuf};

const DEBUGBAR_PATH_ENV: &str = "DEBUGBAR_PATH";
const ERROR_LOG_ENV: &str = "DEBUGBAR_MCP_ERROR_LOG";
const LOG_FILTER_ENV: &str = "RUST_LOG";

pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    let error_log = resolve_error_log(
        cli.error_log.as_deref(),
        env_value(ERROR_LOG_ENV).as_deref(),
        &config,
        &cwd,
        exe_dir().as_deref(),
    );
    let filter = resolve_log_filter(
        cli.log_level.as_deref(),
        env_value(LOG_FILTER_ENV).as_deref(),
        &config,
    );
    logging::init(&error_log, &filter);
    logging::install_panic_hook();

    let debugbar_dir = resolve_debugbar_dir(
        cli.dir.as_deref(),
        env_value(DEBUGBAR_PATH_ENV).as_deref(),
        &config,
        &cwd,
    );
    tracing::debug!("snapshot directory: {}", debugbar_dir.display());

    let client = Client::new(RuntimeConfig::new(debugbar_dir).with_defaults(config.defaults));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => handlers::serve::handle(client),

        Commands::Tree {
            limit,
            include_session,
            include_cookies,
            format,
        } => handlers::tree::handle(&client, limit, include_session, include_cookies, format),

        Commands::Logs {
            ids,
            limit,
            sections,
        } => handlers::logs::handle(&client, ids, limit, sections),

        Commands::Clear => handlers::clear::handle(&client),
    }
}

fn load_config(explicit: Option<&str>, cwd: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            let path = cwd.join(debugbar_runtime::expand_tilde(path));
            if !path.is_file() {
                bail!("config file {} not found", path.display());
            }
            path
        }
        None => Config::default_path(cwd),
    };

    Ok(Config::load_from(&path)?)
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

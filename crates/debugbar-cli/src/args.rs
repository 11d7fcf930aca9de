use crate::types::OutputFormat;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "debugbar-mcp")]
#[command(about = "Inspect Laravel Debugbar request snapshots from an MCP client or the terminal")]
#[command(version)]
pub struct Cli {
    /// Snapshot directory (default: $DEBUGBAR_PATH, config, then ./storage/debugbar)
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Config file (default: ./debugbar-mcp.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Error log file (default: $DEBUGBAR_MCP_ERROR_LOG, config, then error.log beside the binary)
    #[arg(long, global = true)]
    pub error_log: Option<String>,

    /// Log filter written to the error log, e.g. `debug` (default: $RUST_LOG, config, then warn)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Serve MCP over stdio (the default when no command is given)")]
    Serve,

    #[command(about = "Show recent requests grouped into redirect and referral chains")]
    Tree {
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        include_session: bool,

        #[arg(long)]
        include_cookies: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },

    #[command(about = "Print structured reports for snapshots (most recent when no ids are given)")]
    Logs {
        /// Snapshot ids
        ids: Vec<String>,

        #[arg(long)]
        limit: Option<usize>,

        /// Comma-separated sections, e.g. `route,queries,php`
        #[arg(long, value_delimiter = ',')]
        sections: Option<Vec<String>>,
    },

    #[command(about = "Delete every snapshot file in the directory")]
    Clear,
}

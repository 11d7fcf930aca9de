//! `debugbar-mcp`: a stdio MCP server over Laravel Debugbar snapshots, plus
//! terminal commands that run the same queries without an agent.
//!
//! With no subcommand the binary serves MCP on stdin/stdout. Diagnostics go
//! to the error log file only, so stdout stays a clean JSON-RPC channel.

mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;

//! MCP (Model Context Protocol) server implementation.
//!
//! Line-delimited JSON-RPC over stdio exposing the snapshot directory to agents
//! through three tools: `debugbar_get_request_tree`, `debugbar_get_logs` and
//! `debugbar_clear`.

mod server;
mod tools;

pub use server::{DebugbarServer, PROTOCOL_VERSION, SERVER_NAME, run_server};
pub use tools::ToolResult;

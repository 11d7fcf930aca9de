//! Tool argument and response types.
//!
//! Argument structs double as the source of the MCP `inputSchema` objects.

pub mod logs;
pub mod tree;

pub use logs::{GetLogsArgs, LogsViewModel};
pub use tree::GetRequestTreeArgs;

//! MCP tool handlers.
//!
//! `Ok` carries a tool result (possibly flagged `isError`); `Err` is an
//! internal fault that the server turns into a JSON-RPC error.

use serde_json::{Value, json};

use crate::query::{GetLogsArgs, GetRequestTreeArgs, LogsViewModel};
use crate::{Client, Error, to_pretty_json};

/// Text payload of a `tools/call` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub text: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "content": [
                {
                    "type": "text",
                    "text": self.text,
                }
            ],
            "isError": self.is_error,
        })
    }
}

// A missing directory is reported to the caller; anything else is a fault.
fn into_tool_result(result: crate::Result<String>) -> Result<ToolResult, String> {
    match result {
        Ok(text) => Ok(ToolResult::text(text)),
        Err(Error::NotFound(msg)) => Ok(ToolResult::error(msg)),
        Err(Error::InvalidInput(msg)) => Ok(ToolResult::error(msg)),
        Err(Error::Internal(err)) => Err(format!("{:#}", err)),
    }
}

pub fn handle_get_request_tree(
    client: &Client,
    args: GetRequestTreeArgs,
) -> Result<ToolResult, String> {
    let limit = args.limit.unwrap_or(client.config().defaults.tree_limit);
    let options = args.load_options();

    into_tool_result(
        client
            .request_tree(limit, options)
            .and_then(|forest| to_pretty_json(&forest)),
    )
}

pub fn handle_get_logs(client: &Client, args: GetLogsArgs) -> Result<ToolResult, String> {
    let limit = args.limit.unwrap_or(client.config().defaults.logs_limit);
    let sections = args.sections();

    into_tool_result(
        client
            .reports(args.log_ids(), limit, sections.as_slice())
            .and_then(|reports| to_pretty_json(&LogsViewModel::new(reports))),
    )
}

pub fn handle_clear(client: &Client) -> Result<ToolResult, String> {
    into_tool_result(
        client
            .clear()
            .map(|count| format!("Очищено файлов: {}", count)),
    )
}

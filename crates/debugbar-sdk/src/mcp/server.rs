//! MCP JSON-RPC server.

use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use std::panic::AssertUnwindSafe;

use crate::Client;
use crate::query::{GetLogsArgs, GetRequestTreeArgs};

use super::tools::{ToolResult, handle_clear, handle_get_logs, handle_get_request_tree};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "laravel-debugbar-mcp";

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

pub struct DebugbarServer {
    client: Client,
}

impl DebugbarServer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Convert serde deserialization error to MCP-compliant JSON-RPC error
    fn parse_validation_error(tool_name: &str, error: serde_json::Error) -> JsonRpcError {
        tracing::debug!("invalid arguments for {}: {}", tool_name, error);
        JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {}", error),
            data: None,
        }
    }

    /// Process one input line and return the response line, if one is due.
    ///
    /// Blank lines, non-JSON input and anything other than a non-empty JSON
    /// object are ignored without a response.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("ignoring non-JSON input: {}", e);
                return None;
            }
        };

        if !matches!(&value, Value::Object(map) if !map.is_empty()) {
            tracing::debug!("ignoring input that is not a request object");
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("ignoring malformed request: {}", e);
                return None;
            }
        };

        let response = self.handle_request(request)?;
        match serde_json::to_string(&response) {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::error!("failed to encode response: {}", e);
                None
            }
        }
    }

    fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => self.handle_call_tool(request.id, request.params),
            method => {
                // Notifications (no id) never get a response.
                if request.id.is_none() {
                    tracing::debug!("ignoring notification: {}", method);
                    return None;
                }
                Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError {
                        code: -32601,
                        message: format!("Method not found: {}", method),
                        data: None,
                    },
                ))
            }
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "Laravel Debugbar MCP Server - inspect requests captured by Laravel Debugbar. Start with debugbar_get_request_tree to see recent requests and how they chain, then fetch details for specific ids with debugbar_get_logs."
            }),
        )
    }

    fn handle_list_tools(&self, id: Value) -> JsonRpcResponse {
        // Input schemas come from the argument types
        let request_tree_schema = schema_for!(GetRequestTreeArgs);
        let logs_schema = schema_for!(GetLogsArgs);

        JsonRpcResponse::success(
            id,
            json!({
                "tools": [
                    {
                        "name": "debugbar_clear",
                        "description": "Delete all captured Debugbar snapshots. Use before reproducing an issue so later calls only see fresh requests.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {}
                        }
                    },
                    {
                        "name": "debugbar_get_request_tree",
                        "description": "Hierarchical tree of recent requests with GET/POST parameters, time and memory. Redirects and referers nest follow-up requests under the request that caused them; the referer is always included. WORKFLOW: Call this first to find request ids.",
                        "inputSchema": request_tree_schema.to_value(),
                    },
                    {
                        "name": "debugbar_get_logs",
                        "description": "Detailed structured reports for requests (models, views, route, exceptions, messages, gate). Pass ids from debugbar_get_request_tree, or omit them to get the most recent requests. The session section is off by default because of its size.",
                        "inputSchema": logs_schema.to_value(),
                    }
                ]
            }),
        )
    }

    fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Option<JsonRpcResponse> {
        let params = params.unwrap_or(Value::Null);
        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = match params.get("arguments") {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            _ => json!({}),
        };

        let call = match tool_name {
            "debugbar_clear" => ToolCall::Clear,
            "debugbar_get_request_tree" => match serde_json::from_value(arguments) {
                Ok(args) => ToolCall::RequestTree(args),
                Err(e) => {
                    return respond_with_error(id, Self::parse_validation_error(tool_name, e));
                }
            },
            "debugbar_get_logs" => match serde_json::from_value(arguments) {
                Ok(args) => ToolCall::Logs(args),
                Err(e) => {
                    return respond_with_error(id, Self::parse_validation_error(tool_name, e));
                }
            },
            _ => ToolCall::Unknown,
        };

        let result = guard_fault(|| match call {
            ToolCall::Clear => handle_clear(&self.client),
            ToolCall::RequestTree(args) => handle_get_request_tree(&self.client, args),
            ToolCall::Logs(args) => handle_get_logs(&self.client, args),
            ToolCall::Unknown => Ok(ToolResult::error(format!("Tool not found: {}", tool_name))),
        });

        match result {
            Ok(content) => Some(JsonRpcResponse::success(
                id.unwrap_or(Value::Null),
                content.to_value(),
            )),
            Err(e) => {
                tracing::error!("tool {} failed: {}", tool_name, e);
                respond_with_error(
                    id,
                    JsonRpcError {
                        code: -32603,
                        message: format!("Internal error: {}", e),
                        data: None,
                    },
                )
            }
        }
    }

    /// Serve requests from `reader` until end of input, one response line per request.
    pub fn serve<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> std::io::Result<()> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);
            if let Some(response) = self.handle_line(&line) {
                writeln!(writer, "{}", response)?;
                writer.flush()?;
            }
        }
    }
}

enum ToolCall {
    Clear,
    RequestTree(GetRequestTreeArgs),
    Logs(GetLogsArgs),
    Unknown,
}

// A panicking handler becomes an internal error instead of ending the session.
fn guard_fault<F>(handler: F) -> Result<ToolResult, String>
where
    F: FnOnce() -> Result<ToolResult, String>,
{
    std::panic::catch_unwind(AssertUnwindSafe(handler)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string());
        Err(message)
    })
}

// Protocol errors are only sent for requests that carry an id.
fn respond_with_error(id: Option<Value>, error: JsonRpcError) -> Option<JsonRpcResponse> {
    match id {
        Some(id) => Some(JsonRpcResponse::failure(id, error)),
        None => {
            tracing::warn!("dropping error for notification: {}", error.message);
            None
        }
    }
}

/// Run the MCP server over stdio.
pub fn run_server(client: Client) -> anyhow::Result<()> {
    tracing::info!(
        "MCP server listening on stdio (snapshots: {})",
        client.storage().path().display()
    );

    let server = DebugbarServer::new(client);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    server.serve(stdin.lock(), stdout.lock())?;

    tracing::info!("MCP server input closed");
    Ok(())
}

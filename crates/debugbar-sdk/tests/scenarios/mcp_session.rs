//! MCP session scenarios
//!
//! Feeds JSON-RPC lines through `DebugbarServer::serve` the way an MCP client
//! would, and checks the tool results.

use anyhow::Result;
use debugbar_sdk::mcp::DebugbarServer;
use debugbar_testing::assertions::{assert_report_ids, assert_root_ids, tool_text};
use debugbar_testing::{SnapshotBuilder, TestWorld};
use serde_json::{Value, json};

fn exchange(world: &TestWorld, requests: &[Value]) -> Result<Vec<Value>> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();

    DebugbarServer::new(world.client()).serve(input.as_bytes(), &mut output)?;

    String::from_utf8(output)?
        .lines()
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[test]
fn test_request_tree_default_arguments() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("abc123").url("/foo"))?;

    let responses = exchange(&world, &[tool_call(1, "debugbar_get_request_tree", json!({}))])?;

    let text = tool_text(&responses[0], false)?;
    let forest: Value = serde_json::from_str(&text)?;
    assert_root_ids(&forest, &["abc123"])?;
    assert_eq!(forest[0]["children"], json!([]));
    Ok(())
}

#[test]
fn test_referral_child_over_mcp() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("p").url("/list").utime(1_714_557_600.5))?;
    world.add_snapshot(
        SnapshotBuilder::new("c")
            .url("/detail")
            .referer("/list")
            .utime(1_714_557_601.5),
    )?;

    let responses = exchange(&world, &[tool_call(1, "debugbar_get_request_tree", json!({}))])?;

    let forest: Value = serde_json::from_str(&tool_text(&responses[0], false)?)?;
    assert_root_ids(&forest, &["p"])?;
    assert_eq!(forest[0]["children"][0]["id"], "c");
    Ok(())
}

#[test]
fn test_clear_on_empty_directory() -> Result<()> {
    let world = TestWorld::new();

    let responses = exchange(&world, &[tool_call(9, "debugbar_clear", json!({}))])?;

    assert_eq!(responses[0]["id"], 9);
    assert_eq!(tool_text(&responses[0], false)?, "Очищено файлов: 0");
    Ok(())
}

#[test]
fn test_logs_for_missing_id() -> Result<()> {
    let world = TestWorld::new();

    let responses = exchange(
        &world,
        &[tool_call(2, "debugbar_get_logs", json!({"log_ids": ["missing"]}))],
    )?;

    let report: Value = serde_json::from_str(&tool_text(&responses[0], false)?)?;
    assert_eq!(report, json!({"reports": []}));
    Ok(())
}

#[test]
fn test_logs_default_sections() -> Result<()> {
    let world = TestWorld::new();
    world.copy_sample("order_show.json", 1_714_557_601)?;

    let responses = exchange(&world, &[tool_call(3, "debugbar_get_logs", json!({}))])?;

    let text = tool_text(&responses[0], false)?;
    assert!(text.contains("Undefined array key \\\"discount\\\""));

    let report: Value = serde_json::from_str(&text)?;
    assert_report_ids(&report, &["Xshow0000000000000000000000000003"])?;
    let first = report["reports"][0].as_object().unwrap();
    assert!(first.contains_key("route"));
    assert!(first.contains_key("exceptions"));
    assert!(!first.contains_key("session"));
    Ok(())
}

#[test]
fn test_missing_directory_for_every_tool() -> Result<()> {
    let world = TestWorld::new().without_debugbar_dir();
    let expected = format!("Директория {} не найдена.", world.debugbar_dir().display());

    let responses = exchange(
        &world,
        &[
            tool_call(1, "debugbar_get_request_tree", json!({})),
            tool_call(2, "debugbar_get_logs", json!({})),
            tool_call(3, "debugbar_clear", json!({})),
        ],
    )?;

    assert_eq!(responses.len(), 3);
    for response in &responses {
        assert_eq!(tool_text(response, true)?, expected);
    }
    Ok(())
}

#[test]
fn test_protocol_handshake_and_noise() -> Result<()> {
    let world = TestWorld::new();
    let input = [
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({}),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "prompts/list"}),
    ];

    let responses = exchange(&world, &input)?;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "laravel-debugbar-mcp");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 3);
    assert_eq!(responses[2]["error"]["code"], -32601);
    Ok(())
}

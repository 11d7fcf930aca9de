//! Custom assertions for debugbar-specific validation.
//!
//! Provides high-level assertions that make tests more readable:
//! - Tool result envelope checks
//! - Request tree shape checks
//! - Report id checks

use anyhow::{Context, Result};
use serde_json::Value;

/// Text of a `tools/call` response, checking the `isError` flag.
pub fn tool_text(response: &Value, expect_error: bool) -> Result<String> {
    let result = response
        .get("result")
        .with_context(|| format!("Expected a result in response: {}", response))?;

    let is_error = result["isError"]
        .as_bool()
        .context("Expected boolean 'isError' in tool result")?;
    if is_error != expect_error {
        anyhow::bail!("Expected isError={} but got {}", expect_error, result);
    }

    result["content"][0]["text"]
        .as_str()
        .map(str::to_string)
        .context("Expected 'content[0].text' in tool result")
}

fn ids_of(nodes: &Value) -> Result<Vec<String>> {
    nodes
        .as_array()
        .context("Expected an array of nodes")?
        .iter()
        .enumerate()
        .map(|(i, node)| {
            node["id"]
                .as_str()
                .map(str::to_string)
                .with_context(|| format!("Node {} missing id", i))
        })
        .collect()
}

/// Assert the ids of the forest's roots, in order.
pub fn assert_root_ids(forest: &Value, expected: &[&str]) -> Result<()> {
    let ids = ids_of(forest)?;
    if ids != expected {
        anyhow::bail!("Expected roots {:?}, got {:?}", expected, ids);
    }
    Ok(())
}

/// Assert the ids of a node's children, in order.
pub fn assert_child_ids(node: &Value, expected: &[&str]) -> Result<()> {
    let ids = ids_of(&node["children"])?;
    if ids != expected {
        anyhow::bail!(
            "Expected children {:?} under {}, got {:?}",
            expected,
            node["id"],
            ids
        );
    }
    Ok(())
}

/// Assert the `meta.id` of each report in a `{reports: [...]}` document.
pub fn assert_report_ids(json: &Value, expected: &[&str]) -> Result<()> {
    let reports = json["reports"]
        .as_array()
        .context("Expected 'reports' array in JSON")?;

    let ids: Vec<&str> = reports
        .iter()
        .map(|r| r["meta"]["id"].as_str().unwrap_or(""))
        .collect();

    if ids != expected {
        anyhow::bail!("Expected reports {:?}, got {:?}", expected, ids);
    }

    Ok(())
}

//! Report scenarios
//!
//! Verifies section selection and id handling for per-request reports.

use anyhow::Result;
use debugbar_testing::assertions::assert_report_ids;
use debugbar_testing::{SnapshotBuilder, TestWorld};
use serde_json::json;

const NO_SECTIONS: &[&str] = &[];

#[test]
fn test_missing_ids_yield_empty_reports() -> Result<()> {
    let world = TestWorld::new();

    let reports = world
        .client()
        .reports(&["missing".to_string()], 10, NO_SECTIONS)?;

    assert!(reports.is_empty());
    Ok(())
}

#[test]
fn test_defaults_to_most_recent_snapshots() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("first").mtime(1_714_557_600))?;
    world.add_snapshot(SnapshotBuilder::new("second").mtime(1_714_557_610))?;
    world.add_snapshot(SnapshotBuilder::new("third").mtime(1_714_557_620))?;

    let reports = world.client().reports(&[], 2, NO_SECTIONS)?;

    assert_report_ids(&json!({"reports": reports}), &["third", "second"])?;
    Ok(())
}

#[test]
fn test_requested_ids_keep_request_order() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("a"))?;
    world.add_snapshot(SnapshotBuilder::new("b"))?;

    let ids = vec!["b".to_string(), "nope".to_string(), "a".to_string()];
    let reports = world.client().reports(&ids, 10, NO_SECTIONS)?;

    assert_report_ids(&json!({"reports": reports}), &["b", "a"])?;
    Ok(())
}

#[test]
fn test_sections_and_raw_fallback() -> Result<()> {
    let world = TestWorld::new();
    world.copy_sample("order_store.json", 1_714_557_600)?;

    let ids = vec!["X8f1c0a2b3d4e5f60718293a4b5c6d7e8".to_string()];
    let reports = world
        .client()
        .reports(&ids, 10, &["queries", "php", "views", "unknown"])?;

    let report = &reports[0];
    let keys: Vec<&str> = report.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["meta", "queries", "php", "views"]);
    assert_eq!(report["meta"]["status"], 302);
    assert_eq!(report["queries"].as_array().unwrap().len(), 2);
    assert_eq!(report["php"]["version"], "8.3.6");
    Ok(())
}

#[test]
fn test_route_absent_for_closure_routes() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("closure").controller("Closure"))?;
    world.add_snapshot(
        SnapshotBuilder::new("ctrl").controller("App\\Http\\Controllers\\HomeController@index"),
    )?;

    let ids = vec!["closure".to_string(), "ctrl".to_string()];
    let reports = world.client().reports(&ids, 10, &["route"])?;

    assert!(!reports[0].contains_key("route"));
    assert_eq!(reports[1]["route"]["action"], "index");
    Ok(())
}

//! Request tree scenarios
//!
//! Verifies how snapshots on disk become a forest of requests.

use anyhow::Result;
use debugbar_sdk::LoadOptions;
use debugbar_testing::assertions::{assert_child_ids, assert_root_ids};
use debugbar_testing::{SnapshotBuilder, TestWorld};

fn forest_json(
    world: &TestWorld,
    limit: usize,
    options: LoadOptions,
) -> Result<serde_json::Value> {
    let forest = world.client().request_tree(limit, options)?;
    Ok(serde_json::to_value(&forest)?)
}

#[test]
fn test_single_snapshot_is_a_lone_root() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("abc123").url("/foo"))?;

    let forest = forest_json(&world, 50, LoadOptions::new())?;

    assert_root_ids(&forest, &["abc123"])?;
    assert_eq!(forest[0]["url"], "/foo");
    assert_eq!(forest[0]["children"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_referer_links_child_without_session() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("p").url("/list").utime(1_714_557_600.0))?;
    world.add_snapshot(
        SnapshotBuilder::new("c")
            .url("/list/1")
            .referer("/list")
            .utime(1_714_557_603.0),
    )?;

    let forest = forest_json(&world, 50, LoadOptions::new())?;

    assert_root_ids(&forest, &["p"])?;
    assert_child_ids(&forest[0], &["c"])?;
    assert_eq!(forest[0]["children"][0]["referer"], "/list");
    Ok(())
}

#[test]
fn test_redirect_chain_from_samples() -> Result<()> {
    let world = TestWorld::new();
    world.copy_sample("cart_show.json", 1_714_557_590)?;
    world.copy_sample("order_store.json", 1_714_557_600)?;
    world.copy_sample("order_show.json", 1_714_557_601)?;

    let forest = forest_json(&world, 50, LoadOptions::new())?;

    assert_eq!(forest.as_array().unwrap().len(), 1);
    let cart = &forest[0];
    assert_eq!(cart["url"], "http://shop.test/cart");
    let store = &cart["children"][0];
    assert_eq!(store["method"], "POST");
    assert_eq!(store["status"], 302);
    assert_eq!(store["location"], "http://shop.test/orders/7");
    assert_eq!(store["children"][0]["url"], "http://shop.test/orders/7");
    Ok(())
}

#[test]
fn test_limit_keeps_most_recent_files() -> Result<()> {
    let world = TestWorld::new();
    for (i, id) in ["old", "mid", "new"].iter().enumerate() {
        world.add_snapshot(SnapshotBuilder::new(id).utime(1_714_557_600.0 + i as f64 * 10.0))?;
    }

    let forest = forest_json(&world, 2, LoadOptions::new())?;

    assert_root_ids(&forest, &["new", "mid"])?;
    Ok(())
}

#[test]
fn test_optional_details_only_when_requested() -> Result<()> {
    let world = TestWorld::new();
    world.copy_sample("order_store.json", 1_714_557_600)?;

    let plain = forest_json(&world, 50, LoadOptions::new())?;
    assert!(plain[0]["info"].get("session").is_none());
    assert!(plain[0]["info"].get("cookies").is_none());

    let detailed = forest_json(
        &world,
        50,
        LoadOptions::new().with_session(true).with_cookies(true),
    )?;
    assert_eq!(detailed[0]["info"]["session"]["_token"], "b8Yz3kQ1");
    assert_eq!(detailed[0]["info"]["cookies"]["XSRF-TOKEN"], "eyJpdiI6");
    Ok(())
}

#[test]
fn test_unreadable_snapshots_are_skipped() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("good"))?;
    std::fs::write(world.debugbar_dir().join("partial.json"), "{\"__meta\": {")?;

    let forest = forest_json(&world, 50, LoadOptions::new())?;

    assert_root_ids(&forest, &["good"])?;
    Ok(())
}

#[test]
fn test_missing_directory_is_not_found() {
    let world = TestWorld::new().without_debugbar_dir();

    let err = world
        .client()
        .request_tree(50, LoadOptions::new())
        .unwrap_err();

    assert!(matches!(err, debugbar_sdk::Error::NotFound(_)));
}

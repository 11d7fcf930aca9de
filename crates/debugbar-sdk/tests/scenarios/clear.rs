//! Clear scenarios

use anyhow::Result;
use debugbar_testing::{SnapshotBuilder, TestWorld};

#[test]
fn test_clear_empty_directory() -> Result<()> {
    let world = TestWorld::new();

    assert_eq!(world.client().clear()?, 0);
    Ok(())
}

#[test]
fn test_clear_removes_only_snapshots() -> Result<()> {
    let world = TestWorld::new();
    world.add_snapshot(SnapshotBuilder::new("a"))?;
    world.add_snapshot(SnapshotBuilder::new("b"))?;
    std::fs::write(world.debugbar_dir().join(".gitignore"), "*\n!.gitignore\n")?;

    assert_eq!(world.client().clear()?, 2);
    assert!(world.snapshot_names()?.is_empty());
    assert!(world.debugbar_dir().join(".gitignore").exists());
    Ok(())
}

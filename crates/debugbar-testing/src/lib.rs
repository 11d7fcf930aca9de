//! Testing infrastructure for debugbar-mcp integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TestWorld`: Fluent interface for declarative test setup
//! - `assertions`: Custom assertions for tree and report output
//! - `fixtures`: Snapshot generation and sample placement

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{SampleFiles, SnapshotBuilder};
pub use world::{CliResult, TestWorld};

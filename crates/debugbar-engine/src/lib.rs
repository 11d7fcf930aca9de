// Engine module - analysis over loaded snapshots (request trees, reports)
// This layer sits between normalized records (types/providers) and the SDK

pub mod report;
pub mod tree;

pub use report::{Report, build_report};
pub use tree::{NAVIGATION_WINDOW_SECS, ParentLink, RequestArena, build_request_tree};

use debugbar_types::{RequestNode, SnapshotRecord};
use serde_json::{Map, Value};

// Façade API - Stable public interface for the SDK layer

/// Infer parent/child links between snapshots and return the forest, newest root first.
pub fn request_forest(records: Vec<SnapshotRecord>) -> Vec<RequestNode> {
    build_request_tree(records)
}

/// Build the report for one snapshot and keep `meta` plus the requested sections.
pub fn filtered_report<S: AsRef<str>>(data: &Value, sections: &[S]) -> Map<String, Value> {
    build_report(data).select(sections)
}

//! debugbar-sdk: read-only access to Laravel Debugbar snapshots for agents.
//!
//! # Overview
//!
//! Laravel Debugbar writes one JSON snapshot per request into
//! `storage/debugbar`. This crate turns those snapshots into a request tree
//! (which request redirected to or linked to which) and into compact
//! per-request reports, and serves both over MCP.
//!
//! # Quickstart
//!
//! ```no_run
//! use debugbar_sdk::{Client, LoadOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::open("storage/debugbar");
//!
//! for root in client.request_tree(20, LoadOptions::new())? {
//!     println!("{} {} ({} requests)", root.record.method, root.record.url, root.subtree_size());
//! }
//!
//! let reports = client.reports(&[], 5, &["exceptions", "queries"])?;
//! println!("{}", debugbar_sdk::to_pretty_json(&reports)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! This SDK acts as a facade over:
//! - `debugbar-types`: snapshot records, tree nodes and report sections
//! - `debugbar-providers`: dump flattening and snapshot loading
//! - `debugbar-engine`: tree inference and report building
//! - `debugbar-runtime`: configuration and directory access

pub mod client;
pub mod error;
pub mod mcp;
pub mod query;

pub use client::Client;
pub use error::{Error, Result};

pub use debugbar_runtime::{RuntimeConfig, ToolDefaults};
pub use debugbar_types::{LoadOptions, RequestNode, SnapshotRecord};

pub mod types {
    pub use debugbar_types::*;
}

use serde::Serialize;

/// Pretty JSON with four-space indentation, unicode and slashes left unescaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| Error::Internal(e.into()))
}

// Error types
pub mod error;

// Dump dialect handling
pub mod dump;
pub mod entities;
pub mod headers;
pub mod route;

// Snapshot files
pub mod discovery;
pub mod loader;

pub use discovery::{SnapshotFile, scan_snapshots};
pub use dump::{DUMP_MARKER, flatten_dump, flatten_dump_str};
pub use entities::decode_entities;
pub use headers::{HeaderPattern, extract_header};
pub use loader::{load_snapshot, normalize_snapshot, parse_status, read_snapshot_value};
pub use route::parse_controller;

pub use error::{Error, Result};

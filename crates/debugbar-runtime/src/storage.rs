use std::fs;
use std::path::{Path, PathBuf};

use debugbar_providers::{SnapshotFile, load_snapshot, read_snapshot_value, scan_snapshots};
use debugbar_types::{LoadOptions, SnapshotRecord};
use serde_json::Value;

use crate::{Error, Result};

/// Handle to the directory Debugbar writes snapshots into.
///
/// Nothing is cached: every call lists or reads the directory again, since
/// the application keeps writing snapshots while the server runs.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
}

impl LogDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(Error::DirectoryNotFound(self.root.clone()))
        }
    }

    /// The `limit` most recently modified snapshot files.
    pub fn recent(&self, limit: usize) -> Result<Vec<SnapshotFile>> {
        self.ensure_exists()?;
        let mut files = scan_snapshots(&self.root)?;
        files.truncate(limit);
        Ok(files)
    }

    /// Ids of the `limit` most recent snapshots.
    pub fn recent_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self.recent(limit)?.into_iter().map(|f| f.id).collect())
    }

    /// Load the `limit` most recent snapshots, skipping files that fail to decode.
    pub fn load_recent(&self, limit: usize, options: LoadOptions) -> Result<Vec<SnapshotRecord>> {
        let files = self.recent(limit)?;
        let mut records = Vec::with_capacity(files.len());

        for file in &files {
            match load_snapshot(file, options) {
                Ok(record) => records.push(record),
                Err(e) => tracing::debug!("skipping {}: {}", file.path.display(), e),
            }
        }

        Ok(records)
    }

    /// Path of the snapshot named `id`, or `None` when the id could escape the directory.
    pub fn snapshot_path(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\', '\0']) {
            return None;
        }
        Some(self.root.join(format!("{id}.json")))
    }

    /// Decoded snapshot for `id`; `None` when missing or unreadable.
    pub fn read_snapshot(&self, id: &str) -> Option<Value> {
        let path = self.snapshot_path(id)?;
        if !path.is_file() {
            tracing::debug!("snapshot {} not found", id);
            return None;
        }

        match read_snapshot_value(&path) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Delete every snapshot file and return how many were removed.
    pub fn clear(&self) -> Result<usize> {
        self.ensure_exists()?;

        let mut removed = 0;
        for file in scan_snapshots(&self.root)? {
            match fs::remove_file(&file.path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("failed to delete {}: {}", file.path.display(), e),
            }
        }

        tracing::info!("cleared {} snapshot(s) from {}", removed, self.root.display());
        Ok(removed)
    }
}

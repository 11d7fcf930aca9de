use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

use crate::Result;

/// Extension of snapshot files written by Debugbar's file storage.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// A snapshot file found in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    /// File stem, which Debugbar uses as the request id.
    pub id: String,
    pub modified: SystemTime,
}

impl SnapshotFile {
    /// Modification time in (fractional) seconds since the epoch.
    pub fn modified_secs(&self) -> f64 {
        self.modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// List snapshot files directly inside `dir`, most recently modified first.
///
/// Equal modification times are ordered by id so repeated listings agree.
/// Entries that disappear or cannot be stat'ed mid-scan are skipped.
pub fn scan_snapshots(dir: &Path) -> Result<Vec<SnapshotFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                tracing::debug!("skipping unreadable directory entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if id.starts_with('.') {
            continue;
        }

        let modified = match entry.metadata().map(|m| m.modified()) {
            Ok(Ok(modified)) => modified,
            _ => {
                tracing::debug!("skipping {}: no modification time", path.display());
                continue;
            }
        };

        files.push(SnapshotFile {
            path: path.to_path_buf(),
            id: id.to_string(),
            modified,
        });
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.id.cmp(&b.id)));
    Ok(files)
}

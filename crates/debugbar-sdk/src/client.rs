use debugbar_engine::{build_report, request_forest};
use debugbar_runtime::{LogDirectory, RuntimeConfig};
use debugbar_types::{LoadOptions, RequestNode};
use serde_json::{Map, Value};

use crate::error::Result;

/// Entry point for reading a Debugbar snapshot directory.
///
/// Holds only configuration; every call re-reads the directory.
#[derive(Debug, Clone)]
pub struct Client {
    config: RuntimeConfig,
    storage: LogDirectory,
}

impl Client {
    pub fn new(config: RuntimeConfig) -> Self {
        let storage = LogDirectory::new(config.debugbar_dir.clone());
        Self { config, storage }
    }

    /// Client over `dir` with the default tool limits.
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(RuntimeConfig::new(dir))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn storage(&self) -> &LogDirectory {
        &self.storage
    }

    /// Forest of the `limit` most recent requests, newest root first.
    pub fn request_tree(&self, limit: usize, options: LoadOptions) -> Result<Vec<RequestNode>> {
        let records = self.storage.load_recent(limit, options)?;
        tracing::debug!("building request tree from {} snapshot(s)", records.len());
        Ok(request_forest(records))
    }

    /// Filtered reports for `log_ids`, or for the `limit` most recent snapshots
    /// when `log_ids` is empty. Ids that are missing or unreadable are skipped.
    pub fn reports<S: AsRef<str>>(
        &self,
        log_ids: &[String],
        limit: usize,
        sections: &[S],
    ) -> Result<Vec<Map<String, Value>>> {
        if !self.storage.exists() {
            let missing =
                debugbar_runtime::Error::DirectoryNotFound(self.storage.path().to_path_buf());
            return Err(missing.into());
        }

        let ids = if log_ids.is_empty() {
            self.storage.recent_ids(limit)?
        } else {
            log_ids.to_vec()
        };

        Ok(ids
            .iter()
            .filter_map(|id| self.storage.read_snapshot(id))
            .map(|data| build_report(&data).select(sections))
            .collect())
    }

    /// Delete all snapshots, returning how many files were removed.
    pub fn clear(&self) -> Result<usize> {
        Ok(self.storage.clear()?)
    }
}

//! Per-request report query types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured reports (models, views, route, exceptions, messages, gate) for
/// selected snapshots.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetLogsArgs {
    /// Snapshot ids to report on. When empty or omitted, the most recent
    /// snapshots are used.
    #[serde(default)]
    pub log_ids: Option<Vec<String>>,
    /// Number of most recent snapshots to report on when `log_ids` is empty (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Sections to include besides `meta`. Default: models, views, route,
    /// exceptions, messages, gate. Also available: queries, session (large),
    /// or any top-level collector key such as `php`.
    #[serde(default)]
    pub sections: Option<Vec<String>>,
}

impl GetLogsArgs {
    pub fn log_ids(&self) -> &[String] {
        self.log_ids.as_deref().unwrap_or_default()
    }

    pub fn sections(&self) -> Vec<String> {
        self.sections
            .clone()
            .unwrap_or_else(debugbar_types::default_sections)
    }
}

#[derive(Debug, Serialize)]
pub struct LogsViewModel {
    pub reports: Vec<Map<String, Value>>,
}

impl LogsViewModel {
    pub fn new(reports: Vec<Map<String, Value>>) -> Self {
        Self { reports }
    }
}

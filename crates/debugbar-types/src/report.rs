use serde::Serialize;
use serde_json::Value;

/// Sections returned by `debugbar_get_logs` when the caller does not choose.
pub const DEFAULT_SECTIONS: &[&str] =
    &["models", "views", "route", "exceptions", "messages", "gate"];

/// Report section names with dedicated handling. Any other requested name is
/// looked up as a raw top-level key of the snapshot.
pub const BUILTIN_SECTIONS: &[&str] = &[
    "meta",
    "route",
    "models",
    "views",
    "queries",
    "exceptions",
    "messages",
    "gate",
    "session",
];

pub fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub id: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub status: i64,
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSection {
    pub class: String,
    pub uri: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub class: String,
    pub retrieved: i64,
    pub created: i64,
    pub updated: i64,
    pub deleted: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub name: String,
    pub render_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySummary {
    pub sql: Value,
    pub duration: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Exception fields are copied verbatim from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionSummary {
    pub message: Value,
    pub file: Value,
    pub line: Value,
}

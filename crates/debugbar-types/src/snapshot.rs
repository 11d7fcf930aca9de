use serde::Serialize;
use serde_json::Value;

/// Normalized view of one Debugbar snapshot file.
///
/// Built fresh from disk on every request; the raw decoded JSON is kept so the
/// report builder can project additional sections later without re-reading.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRecord {
    /// `__meta.id`, or the file stem when the snapshot does not declare one.
    pub id: String,
    pub url: String,
    pub method: String,
    pub status: i64,
    /// Local clock time (`HH:MM:SS`) of `utime`.
    pub time: String,
    /// Seconds since the epoch, used for ordering and proximity tests.
    pub utime: f64,
    pub info: RequestInfo,
    pub referer: String,
    pub location: String,
    pub session_token: String,

    #[serde(skip)]
    pub raw: Value,
}

/// Request-level details shown in the request tree.
#[derive(Debug, Clone, Serialize)]
pub struct RequestInfo {
    pub params: RequestParams,
    pub performance: Performance,
    pub controller: Option<ControllerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestParams {
    pub query: Value,
    pub request: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Performance {
    pub time: String,
    pub memory: String,
}

/// Controller class and action parsed from a route descriptor such as
/// `App\Http\Controllers\UserController@show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerRef {
    pub class: String,
    pub action: Option<String>,
}

/// Which optional, potentially large, request details to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub include_session: bool,
    pub include_cookies: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, include: bool) -> Self {
        self.include_session = include;
        self
    }

    pub fn with_cookies(mut self, include: bool) -> Self {
        self.include_cookies = include;
        self
    }
}

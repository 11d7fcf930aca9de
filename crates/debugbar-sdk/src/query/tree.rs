//! Request tree query types.

use debugbar_types::LoadOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hierarchical tree of the most recent requests, with GET/POST parameters,
/// timing and memory. Redirects and referers link follow-up requests to the
/// request that caused them.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetRequestTreeArgs {
    /// Number of most recent snapshot files to analyze (default: 50)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Include each request's session data (default: false)
    #[serde(default)]
    pub include_session: Option<bool>,
    /// Include each request's cookies (default: false)
    #[serde(default)]
    pub include_cookies: Option<bool>,
}

impl GetRequestTreeArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .with_session(self.include_session.unwrap_or(false))
            .with_cookies(self.include_cookies.unwrap_or(false))
    }
}

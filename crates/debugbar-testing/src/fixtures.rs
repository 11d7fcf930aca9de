//! Fixtures for snapshot generation and placement.
//!
//! Provides utilities to:
//! - Copy the sample snapshots shipped with `debugbar-providers`
//! - Build snapshot files the way Debugbar's file storage writes them
//! - Pin file modification times so "most recent" ordering is deterministic

use anyhow::{Context, Result};
use filetime::FileTime;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Sample file manager for test data.
pub struct SampleFiles {
    samples_dir: PathBuf,
}

impl Default for SampleFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFiles {
    /// Create a new sample file manager.
    ///
    /// Assumes samples are in `crates/debugbar-providers/tests/samples/`.
    pub fn new() -> Self {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let samples_dir = manifest_dir
            .parent()
            .unwrap()
            .join("debugbar-providers/tests/samples");

        Self { samples_dir }
    }

    pub fn path(&self, sample_name: &str) -> PathBuf {
        self.samples_dir.join(sample_name)
    }

    /// The `__meta.id` a sample carries. Debugbar names its files after it.
    pub fn snapshot_id(&self, sample_name: &str) -> Result<String> {
        let source = self.path(sample_name);
        let text =
            fs::read_to_string(&source).with_context(|| format!("reading {}", source.display()))?;
        let value: Value = serde_json::from_str(&text)?;
        value
            .pointer("/__meta/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .with_context(|| format!("{} has no __meta.id", source.display()))
    }

    /// Copy a sample file to a destination.
    pub fn copy_to(&self, sample_name: &str, dest: &Path) -> Result<()> {
        let source = self.path(sample_name);
        fs::copy(&source, dest).with_context(|| format!("copying {}", source.display()))?;
        Ok(())
    }
}

/// Set a file's modification time to `unix_secs`.
pub fn set_mtime(path: &Path, unix_secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0))?;
    Ok(())
}

/// Render headers the way Debugbar dumps them: an `sf-dump` array of
/// single-element arrays keyed by lower-case header name.
pub fn headers_dump(pairs: &[(&str, &str)]) -> String {
    let mut out = format!(
        "<pre class=sf-dump id=sf-dump-1001 data-indent-pad=\"  \"><span class=sf-dump-note>array:{}</span> [<samp data-depth=1 class=sf-dump-expanded>\n",
        pairs.len()
    );
    for (name, value) in pairs {
        out.push_str(&format!(
            "  \"<span class=sf-dump-key>{name}</span>\" => <span class=sf-dump-note>array:1</span> [<samp data-depth=2 class=sf-dump-compact>\n    <span class=sf-dump-index>0</span> => \"<span class=sf-dump-str title=\"{len} characters\">{value}</span>\"\n  </samp>]\n",
            len = value.chars().count(),
            value = value.replace('&', "&amp;"),
        ));
    }
    out.push_str("</samp>]\n</pre><script>Sfdump(\"sf-dump-1001\")</script>\n");
    out
}

/// Builder for one Debugbar snapshot file.
///
/// # Example
/// ```no_run
/// use debugbar_testing::SnapshotBuilder;
///
/// let snapshot = SnapshotBuilder::new("p")
///     .url("http://app.test/list")
///     .utime(1_714_557_600.0)
///     .session_token("tok");
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    id: String,
    url: String,
    method: String,
    status: Value,
    utime: Option<f64>,
    mtime: Option<i64>,
    referer: Option<String>,
    location: Option<String>,
    session_token: Option<String>,
    controller: Option<String>,
    sections: Map<String, Value>,
}

impl SnapshotBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            url: format!("http://app.test/{}", id),
            method: "GET".to_string(),
            status: json!("200 OK"),
            utime: None,
            mtime: None,
            referer: None,
            location: None,
            session_token: None,
            controller: None,
            sections: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn status(mut self, status: impl Into<Value>) -> Self {
        self.status = status.into();
        self
    }

    /// Request time recorded in `__meta.utime`; also the default file mtime.
    pub fn utime(mut self, utime: f64) -> Self {
        self.utime = Some(utime);
        self
    }

    pub fn mtime(mut self, unix_secs: i64) -> Self {
        self.mtime = Some(unix_secs);
        self
    }

    pub fn referer(mut self, referer: &str) -> Self {
        self.referer = Some(referer.to_string());
        self
    }

    /// Redirect target, recorded in the request headers dump.
    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn session_token(mut self, token: &str) -> Self {
        self.session_token = Some(token.to_string());
        self
    }

    pub fn controller(mut self, descriptor: &str) -> Self {
        self.controller = Some(descriptor.to_string());
        self
    }

    /// Add or replace a top-level collector section.
    pub fn section(mut self, name: &str, value: Value) -> Self {
        self.sections.insert(name.to_string(), value);
        self
    }

    pub fn build(&self) -> Value {
        let mut request_headers = vec![("host", "app.test")];
        if let Some(referer) = &self.referer {
            request_headers.push(("referer", referer.as_str()));
        }
        if let Some(location) = &self.location {
            request_headers.push(("location", location.as_str()));
        }
        let response_headers = [("content-type", "text/html; charset=UTF-8")];

        let mut meta = json!({
            "id": self.id,
            "datetime": "2024-05-01 10:00:00",
            "method": self.method,
            "uri": self.url,
        });
        if let Some(utime) = self.utime {
            meta["utime"] = json!(utime);
        }

        let mut data = json!({
            "__meta": meta,
            "memory": {"peak_usage_str": "2MB"},
            "request": {
                "data": {
                    "full_url": self.url,
                    "status": self.status,
                    "duration_str": "12ms",
                    "request_query": [],
                    "request_request": [],
                    "request_headers": headers_dump(&request_headers),
                    "response_headers": headers_dump(&response_headers),
                }
            },
        });

        if let Some(controller) = &self.controller {
            data["route"] = json!({"uri": self.url, "controller": controller});
        }
        if let Some(token) = &self.session_token {
            data["session"] = json!({"_token": token});
        }
        if let Value::Object(map) = &mut data {
            for (name, value) in &self.sections {
                map.insert(name.clone(), value.clone());
            }
        }

        data
    }

    /// Write `<id>.json` into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.id));
        fs::write(&path, serde_json::to_string_pretty(&self.build())?)?;

        if let Some(secs) = self.mtime.or(self.utime.map(|t| t.trunc() as i64)) {
            set_mtime(&path, secs)?;
        }

        Ok(path)
    }
}

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use debugbar_types::{LoadOptions, Performance, RequestInfo, RequestParams, SnapshotRecord};
use serde_json::{Map, Value};

use crate::discovery::SnapshotFile;
use crate::dump::{flatten_dump, flatten_dump_str};
use crate::headers::extract_header;
use crate::route::parse_controller;
use crate::{Error, Result};

const UNKNOWN: &str = "UNKNOWN";

/// Read and decode a snapshot file.
///
/// Anything other than a non-empty JSON object is rejected, so callers can skip
/// truncated or foreign files uniformly.
pub fn read_snapshot_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match &value {
        Value::Object(map) if !map.is_empty() => Ok(value),
        _ => Err(Error::Parse(format!(
            "{} does not contain a snapshot object",
            path.display()
        ))),
    }
}

/// Load one snapshot file into a normalized record.
pub fn load_snapshot(file: &SnapshotFile, options: LoadOptions) -> Result<SnapshotRecord> {
    let data = read_snapshot_value(&file.path)?;
    Ok(normalize_snapshot(
        &file.id,
        data,
        file.modified_secs(),
        options,
    ))
}

/// Project decoded snapshot JSON into a [`SnapshotRecord`].
///
/// `file_id` and `fallback_utime` stand in for `__meta.id` and `__meta.utime`
/// when the snapshot does not carry them. Missing fields never fail the load.
pub fn normalize_snapshot(
    file_id: &str,
    data: Value,
    fallback_utime: f64,
    options: LoadOptions,
) -> SnapshotRecord {
    let request = data.pointer("/request/data");
    let request_field = |key: &str| request.and_then(|r| r.get(key));

    let headers = request_field("request_headers")
        .and_then(Value::as_str)
        .unwrap_or("");

    let id = str_at(&data, "/__meta/id").unwrap_or(file_id).to_string();
    let url = request_field("full_url")
        .and_then(Value::as_str)
        .or_else(|| str_at(&data, "/__meta/uri"))
        .unwrap_or(UNKNOWN)
        .to_string();
    let method = str_at(&data, "/__meta/method")
        .unwrap_or(UNKNOWN)
        .to_string();
    let status = parse_status(request_field("status"));
    let utime = data
        .pointer("/__meta/utime")
        .and_then(parse_seconds)
        .unwrap_or(fallback_utime);

    let info = RequestInfo {
        params: RequestParams {
            query: flatten_or_empty(request_field("request_query")),
            request: flatten_or_empty(request_field("request_request")),
        },
        performance: Performance {
            time: request_field("duration_str")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string(),
            memory: str_at(&data, "/memory/peak_usage_str")
                .unwrap_or(UNKNOWN)
                .to_string(),
        },
        controller: str_at(&data, "/route/controller").and_then(parse_controller),
        cookies: options
            .include_cookies
            .then(|| flatten_or_empty(request_field("request_cookies"))),
        session: options
            .include_session
            .then(|| flatten_or_empty(data.get("session"))),
    };

    let session_token = str_at(&data, "/session/_token")
        .map(flatten_dump_str)
        .unwrap_or_default();

    SnapshotRecord {
        id,
        url,
        method,
        status,
        time: clock_time(utime),
        utime,
        info,
        referer: extract_header(headers, "referer"),
        location: extract_header(headers, "location"),
        session_token,
        raw: data,
    }
}

fn str_at<'a>(data: &'a Value, pointer: &str) -> Option<&'a str> {
    data.pointer(pointer).and_then(Value::as_str)
}

fn flatten_or_empty(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(v) => flatten_dump(v),
    }
}

/// Integer status code from a number or a string such as `"302 Found"`.
pub fn parse_status(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_integer(s),
        _ => 0,
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn parse_seconds(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn clock_time(utime: f64) -> String {
    DateTime::from_timestamp(utime.trunc() as i64, 0)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_dump(pairs: &[(&str, &str)]) -> String {
        let mut out = String::from("<pre class=sf-dump id=sf-dump-1><samp>\n");
        for (key, value) in pairs {
            out.push_str(&format!(
                "  \"<span class=sf-dump-key>{key}</span>\" => <span class=sf-dump-note>array:1</span> [\n    0 => \"<span class=sf-dump-str>{value}</span>\"\n  ]\n"
            ));
        }
        out.push_str("</samp></pre>");
        out
    }

    fn sample() -> Value {
        json!({
            "__meta": {
                "id": "01HXYZ",
                "datetime": "2024-05-01 10:00:00",
                "utime": 1714557600.25,
                "method": "POST",
                "uri": "/orders",
            },
            "request": {
                "data": {
                    "full_url": "http://shop.test/orders",
                    "status": "302 Found",
                    "duration_str": "84.2ms",
                    "request_query": [],
                    "request_request": {"qty": "<pre class=sf-dump><span class=sf-dump-str>2</span></pre>"},
                    "request_cookies": {"XSRF-TOKEN": "abc"},
                    "request_headers": headers_dump(&[
                        ("referer", "http://shop.test/cart"),
                        ("location", "http://shop.test/orders/7"),
                    ]),
                }
            },
            "memory": {"peak_usage_str": "4MB"},
            "route": {"controller": "App\\Http\\Controllers\\OrderController@store"},
            "session": {"_token": "tok-1", "cart": "[]"},
        })
    }

    #[test]
    fn test_normalize_full_snapshot() {
        let record = normalize_snapshot("file-stem", sample(), 0.0, LoadOptions::new());

        assert_eq!(record.id, "01HXYZ");
        assert_eq!(record.url, "http://shop.test/orders");
        assert_eq!(record.method, "POST");
        assert_eq!(record.status, 302);
        assert_eq!(record.utime, 1714557600.25);
        assert_eq!(record.referer, "http://shop.test/cart");
        assert_eq!(record.location, "http://shop.test/orders/7");
        assert_eq!(record.session_token, "tok-1");
        assert_eq!(record.info.performance.time, "84.2ms");
        assert_eq!(record.info.performance.memory, "4MB");
        assert_eq!(record.info.params.request, json!({"qty": "\"2\""}));
        assert_eq!(record.info.params.query, json!([]));

        let controller = record.info.controller.as_ref().unwrap();
        assert_eq!(controller.class, "App\\Http\\Controllers\\OrderController");
        assert_eq!(controller.action.as_deref(), Some("store"));

        assert!(record.info.cookies.is_none());
        assert!(record.info.session.is_none());
        assert_eq!(record.time.len(), 8);
    }

    #[test]
    fn test_headers_read_from_request_dump_only() {
        let mut data = sample();
        data["request"]["data"]["request_headers"] =
            json!(headers_dump(&[("referer", "http://shop.test/cart")]));
        data["request"]["data"]["response_headers"] =
            json!(headers_dump(&[("location", "http://shop.test/orders/8")]));

        let record = normalize_snapshot("x", data, 0.0, LoadOptions::new());

        assert_eq!(record.referer, "http://shop.test/cart");
        assert_eq!(record.location, "");
    }

    #[test]
    fn test_optional_sections_on_request() {
        let options = LoadOptions::new().with_cookies(true).with_session(true);
        let record = normalize_snapshot("file-stem", sample(), 0.0, options);

        assert_eq!(record.info.cookies, Some(json!({"XSRF-TOKEN": "abc"})));
        assert_eq!(
            record.info.session,
            Some(json!({"_token": "tok-1", "cart": "[]"}))
        );

        let serialized = serde_json::to_value(&record).unwrap();
        assert!(serialized["info"].get("cookies").is_some());
        assert!(serialized.get("raw").is_none());
    }

    #[test]
    fn test_minimal_snapshot_uses_fallbacks() {
        let record = normalize_snapshot(
            "abc123",
            json!({"__meta": {}}),
            1_700_000_000.0,
            LoadOptions::new(),
        );

        assert_eq!(record.id, "abc123");
        assert_eq!(record.url, "UNKNOWN");
        assert_eq!(record.method, "UNKNOWN");
        assert_eq!(record.status, 0);
        assert_eq!(record.utime, 1_700_000_000.0);
        assert_eq!(record.referer, "");
        assert_eq!(record.location, "");
        assert_eq!(record.session_token, "");
        assert_eq!(record.info.performance.time, "UNKNOWN");
        assert!(record.info.controller.is_none());
        assert_eq!(record.info.params.query, json!({}));

        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(serialized["info"]["controller"], Value::Null);
        assert!(serialized["info"].get("session").is_none());
    }

    #[test]
    fn test_meta_uri_used_without_full_url() {
        let data = json!({"__meta": {"uri": "/health", "utime": "1700000000.5"}});
        let record = normalize_snapshot("x", data, 0.0, LoadOptions::new());

        assert_eq!(record.url, "/health");
        assert_eq!(record.utime, 1_700_000_000.5);
    }

    #[test]
    fn test_parse_status_variants() {
        assert_eq!(parse_status(Some(&json!(404))), 404);
        assert_eq!(parse_status(Some(&json!("500 Internal Server Error"))), 500);
        assert_eq!(parse_status(Some(&json!(" 201"))), 201);
        assert_eq!(parse_status(Some(&json!("OK"))), 0);
        assert_eq!(parse_status(None), 0);
    }

    #[test]
    fn test_read_rejects_non_objects() {
        let temp = tempfile::TempDir::new().unwrap();
        let empty = temp.path().join("empty.json");
        let broken = temp.path().join("broken.json");
        let list = temp.path().join("list.json");
        fs::write(&empty, "{}").unwrap();
        fs::write(&broken, "{\"__meta\":").unwrap();
        fs::write(&list, "[1, 2]").unwrap();

        assert!(matches!(read_snapshot_value(&empty), Err(Error::Parse(_))));
        assert!(matches!(read_snapshot_value(&broken), Err(Error::Json(_))));
        assert!(matches!(read_snapshot_value(&list), Err(Error::Parse(_))));
    }
}

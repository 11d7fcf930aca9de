//! Targeted lookup of a single request header in the `request_headers` dump.
//!
//! Full flattening of a headers dump is wasteful when only one scalar is needed,
//! so this matches the header's key span and the first string span after it.

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::decode_entities;

static REFERER: LazyLock<Option<HeaderPattern>> = LazyLock::new(|| HeaderPattern::new("referer"));
static LOCATION: LazyLock<Option<HeaderPattern>> =
    LazyLock::new(|| HeaderPattern::new("location"));

/// Compiled matcher for one header name.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    regex: Regex,
}

impl HeaderPattern {
    pub fn new(name: &str) -> Option<Self> {
        let pattern = format!(
            r#"(?s)"<span class=sf-dump-key>{}</span>".*?"<span class=sf-dump-str[^>]*>([^<]*)</span>""#,
            regex::escape(name)
        );
        Regex::new(&pattern).ok().map(|regex| Self { regex })
    }

    /// First value of the header, entity-decoded; empty when absent.
    pub fn extract(&self, headers_dump: &str) -> String {
        if headers_dump.is_empty() {
            return String::new();
        }

        self.regex
            .captures(headers_dump)
            .and_then(|caps| caps.get(1))
            .map(|m| decode_entities(m.as_str()).into_owned())
            .unwrap_or_default()
    }
}

/// Extract the value of `name` from a headers dump, or an empty string.
pub fn extract_header(headers_dump: &str, name: &str) -> String {
    let cached = match name {
        "referer" => REFERER.as_ref(),
        "location" => LOCATION.as_ref(),
        _ => None,
    };

    match cached {
        Some(pattern) => pattern.extract(headers_dump),
        None => HeaderPattern::new(name)
            .map(|pattern| pattern.extract(headers_dump))
            .unwrap_or_default(),
    }
}

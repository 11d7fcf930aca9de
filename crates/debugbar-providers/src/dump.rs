//! Flattening of Symfony VarDumper HTML (`sf-dump`) into plain text.
//!
//! Debugbar stores many collector values as pre-rendered dump markup. This module
//! turns that markup back into readable, indented text. It is a best-effort
//! textual flattening: nested arrays and objects stay as indented lines, they are
//! not re-parsed into JSON.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::entities::decode_entities;

/// Substring that identifies a value as dump markup.
pub const DUMP_MARKER: &str = "sf-dump";

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap());
static KEY_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class=["']?sf-dump-key["']?[^>]*>(.*?)</span>"#).unwrap()
});
static STR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class=["']?sf-dump-str["']?[^>]*>(.*?)</span>"#).unwrap()
});
static NOTE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class=["']?sf-dump-note["']?[^>]*>(.*?)</span>"#).unwrap()
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Flatten every dump string inside `value`, preserving object keys and array order.
///
/// Non-string scalars and strings without [`DUMP_MARKER`] are returned unchanged.
pub fn flatten_dump(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(flatten_dump_str(s)),
        Value::Array(items) => Value::Array(items.iter().map(flatten_dump).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), flatten_dump(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

/// Flatten one dump fragment into plain multi-line text.
pub fn flatten_dump_str(input: &str) -> String {
    if !input.contains(DUMP_MARKER) {
        return input.to_string();
    }

    let text = SCRIPT_BLOCK.replace_all(input, "");
    let text = KEY_SPAN.replace_all(&text, "${1}");
    let text = STR_SPAN.replace_all(&text, "\"${1}\"");
    let text = NOTE_SPAN.replace_all(&text, "(${1})");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    text.split('\n')
        .filter(|line| !trim_blank(line).is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// Same character set PHP's trim() strips; non-breaking spaces are content.
fn trim_blank(line: &str) -> &str {
    line.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HEADERS_DUMP: &str = r#"<pre class=sf-dump id=sf-dump-1 data-indent-pad="  "><span class=sf-dump-note>array:2</span> [<samp data-depth=1 class=sf-dump-expanded>
  "<span class=sf-dump-key>host</span>" => <span class=sf-dump-note>array:1</span> [<samp data-depth=2 class=sf-dump-compact>
    <span class=sf-dump-index>0</span> => "<span class=sf-dump-str title="9 characters">localhost</span>"
  </samp>]

  "<span class=sf-dump-key>accept</span>" => "<span class=sf-dump-str title="9 characters">text/html</span>"
</samp>]
</pre><script>Sfdump("sf-dump-1")</script>
"#;

    #[test]
    fn test_plain_string_is_returned_unchanged() {
        let plain = "  just <b>text</b> &amp; more\n\n";
        assert_eq!(flatten_dump_str(plain), plain);
    }

    #[test]
    fn test_flatten_headers_dump() {
        let text = flatten_dump_str(HEADERS_DUMP);

        assert!(!text.contains('<'), "tags left in: {text}");
        assert!(!text.contains("Sfdump"), "script left in: {text}");
        assert!(text.contains("(array:2) ["));
        assert!(text.contains(r#""host" => (array:1) ["#));
        assert!(text.contains(r#"0 => ""localhost"""#));
        assert!(text.contains(r#""accept" => ""text/html"""#));
    }

    #[test]
    fn test_blank_lines_dropped_but_indentation_kept() {
        let text = flatten_dump_str(HEADERS_DUMP);

        for line in text.lines() {
            assert!(!line.trim().is_empty());
        }
        assert!(text.lines().any(|l| l.starts_with("    0 => ")));
    }

    #[test]
    fn test_quoted_class_attributes_are_recognised() {
        let html = r#"<pre class="sf-dump"><span class="sf-dump-key">name</span>: <span class='sf-dump-str'>Tom &amp; Jerry</span> <span class="sf-dump-note">note</span></pre>"#;

        assert_eq!(flatten_dump_str(html), r#"name: "Tom & Jerry" (note)"#);
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = "<pre class=sf-dump>&lt;div&gt; &quot;quoted&quot; &#039;single&#039; &#x41;</pre>";

        assert_eq!(flatten_dump_str(html), r#"<div> "quoted" 'single' A"#);
    }

    #[test]
    fn test_flatten_recurses_into_containers() {
        let value = json!({
            "plain": "hello",
            "count": 3,
            "nested": ["<pre class=sf-dump><span class=sf-dump-num>42</span></pre>", null],
        });

        let flattened = flatten_dump(&value);

        assert_eq!(
            flattened,
            json!({
                "plain": "hello",
                "count": 3,
                "nested": ["42", null],
            })
        );
    }

    #[test]
    fn test_flatten_keeps_key_order() {
        let value = json!({"zeta": "a", "alpha": "b"});
        let keys: Vec<_> = flatten_dump(&value)
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();

        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}

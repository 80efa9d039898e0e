//! Text extraction helpers for heterogeneous IIIF metadata values.
//!
//! Manifest values may be strings, lists, or nested objects, and frequently
//! embed HTML fragments. Everything funnels through [`extract_value`], which
//! flattens, strips markup, and normalizes whitespace.

use scraper::Html;
use serde_json::Value;

/// Recursively collect strings and integers from a JSON value.
///
/// Objects contribute their values, arrays their items, in document order.
/// Other scalar types are skipped.
pub fn flatten_json_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => {
            for item in items {
                flatten_json_text(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                flatten_json_text(item, out);
            }
        }
        _ => {}
    }
}

/// Strip HTML markup from a text fragment, keeping its text content.
pub fn strip_html(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect::<Vec<_>>().concat()
}

/// Normalize whitespace: newlines become spaces, runs of spaces collapse,
/// leading/trailing whitespace is trimmed. Modifier-letter apostrophes are
/// standardized to plain apostrophes.
pub fn clean_text(text: &str) -> String {
    text.replace('ʼ', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fully extract a metadata value: flatten nested structure, comma-join,
/// strip HTML, clean whitespace. `None` when nothing textual remains.
pub fn extract_value(value: &Value) -> Option<String> {
    let mut parts = Vec::new();
    flatten_json_text(value, &mut parts);
    if parts.is_empty() {
        return None;
    }
    let joined = parts.join(", ");
    let text = clean_text(&strip_html(&joined));
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_values() {
        let value = json!({"@value": ["First", {"inner": 2}], "other": "Last"});
        let mut out = Vec::new();
        flatten_json_text(&value, &mut out);
        assert_eq!(out, vec!["First", "2", "Last"]);
    }

    #[test]
    fn test_strip_html_keeps_text() {
        assert_eq!(
            strip_html("A <b>bold</b> <a href=\"x\">link</a>"),
            "A bold link"
        );
        assert_eq!(strip_html("no markup"), "no markup");
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a\n b\r\n  c  "), "a b c");
        assert_eq!(clean_text("Qurʼan"), "Qur'an");
    }

    #[test]
    fn test_extract_value_handles_shapes() {
        assert_eq!(extract_value(&json!("Plain")), Some("Plain".to_string()));
        assert_eq!(
            extract_value(&json!(["One", "Two"])),
            Some("One, Two".to_string())
        );
        assert_eq!(
            extract_value(&json!({"@value": "<i>Styled</i>"})),
            Some("Styled".to_string())
        );
        assert_eq!(extract_value(&json!(null)), None);
        assert_eq!(extract_value(&json!("")), None);
    }
}

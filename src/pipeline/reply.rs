//! Model-reply cleanup: from raw completion text to a flat record.
//!
//! Even when told not to, models wrap JSON in ```` ```json ```` fences, add
//! a BOM, or use CRLF line endings. These rules undo that before parsing.
//!
//! ## Rule Order
//!
//! 1. Normalise line endings (CRLF → LF)
//! 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 3. Strip code-fence markers anywhere in the reply
//! 4. Trim
//! 5. Parse; anything but a JSON object is rejected

use crate::error::ItemError;
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Longest reply prefix quoted back in a [`ItemError::MalformedReply`].
const EXCERPT_CHARS: usize = 100;

/// Apply all cleanup rules to the raw reply text.
pub fn clean_reply(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = strip_code_fences(&s);
    s.trim().to_string()
}

/// Clean `reply` and parse it as a record.
pub fn parse_reply(reply: &str) -> Result<Record, ItemError> {
    let cleaned = clean_reply(reply);
    let malformed = |detail: String| ItemError::MalformedReply {
        detail,
        excerpt: reply.trim().chars().take(EXCERPT_CHARS).collect(),
    };

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Strip code fences ────────────────────────────────────────────────

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json|JSON)?").unwrap());

fn strip_code_fences(input: &str) -> String {
    RE_FENCE.replace_all(input, "").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n{\"rank\": \"12\"}\n```";
        assert_eq!(clean_reply(input), "{\"rank\": \"12\"}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let input = "```\n{\"rank\": \"12\"}\n```";
        assert_eq!(clean_reply(input), "{\"rank\": \"12\"}");
    }

    #[test]
    fn test_no_fence_passthrough() {
        assert_eq!(clean_reply("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_remove_invisible() {
        assert_eq!(remove_invisible_chars("\u{FEFF}{\u{200B}}"), "{}");
    }

    #[test]
    fn parse_fenced_object() {
        let reply = "```json\r\n{\"rank\": \"12\", \"total_faculty\": 340}\r\n```\r\n";
        let record = parse_reply(reply).unwrap();
        assert_eq!(record["rank"], "12");
        assert_eq!(record["total_faculty"], 340);
    }

    #[test]
    fn parse_keeps_key_order() {
        let record = parse_reply(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn parse_rejects_array() {
        let err = parse_reply("[{\"rank\": 1}]").unwrap_err();
        match err {
            ItemError::MalformedReply { detail, .. } => assert!(detail.contains("an array")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_prose() {
        let err = parse_reply("I could not find the institute in this text.").unwrap_err();
        match err {
            ItemError::MalformedReply { excerpt, .. } => {
                assert!(excerpt.starts_with("I could not find"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn excerpt_is_bounded() {
        let long = "x".repeat(500);
        match parse_reply(&long).unwrap_err() {
            ItemError::MalformedReply { excerpt, .. } => assert_eq!(excerpt.chars().count(), 100),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

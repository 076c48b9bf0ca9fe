//! POST body decoding
//!
//! The relay accepts three body shapes, tried in a fixed order:
//!
//! 1. JSON object with a string `command` field
//! 2. URL-encoded form with a `command` field (only if the body contains `=`)
//! 3. Raw text, trimmed
//!
//! Anything that cannot be decoded yields an empty candidate, which then
//! fails alphabet validation like any other bad command.

use serde_json::Value;
use url::form_urlencoded;

/// Extract the uppercased command candidate from a POST body
///
/// JSON wins whenever the body is syntactically valid JSON, even if it is
/// not an object or has no usable `command` field. Only JSON syntax errors
/// fall through to form and raw decoding.
pub fn extract_candidate(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase(),
        Err(_) if body.contains('=') => form_urlencoded::parse(body.as_bytes())
            .find(|(key, value)| key == "command" && !value.is_empty())
            .map(|(_, value)| value.to_uppercase())
            .unwrap_or_default(),
        Err(_) => body.trim().to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object() {
        assert_eq!(extract_candidate(r#"{"command":"r"}"#), "R");
        assert_eq!(extract_candidate(r#"{ "command" : "L", "extra": 1 }"#), "L");
    }

    #[test]
    fn test_json_is_not_trimmed() {
        assert_eq!(extract_candidate(r#"{"command":" u "}"#), " U ");
    }

    #[test]
    fn test_json_without_usable_command() {
        assert_eq!(extract_candidate(r#"{"cmd":"L"}"#), "");
        assert_eq!(extract_candidate(r#"{"command":5}"#), "");
        assert_eq!(extract_candidate(r#"["L"]"#), "");
        assert_eq!(extract_candidate(r#""L""#), "");
        assert_eq!(extract_candidate("1"), "");
    }

    #[test]
    fn test_form_encoded() {
        assert_eq!(extract_candidate("command=d"), "D");
        assert_eq!(extract_candidate("user=me&command=U"), "U");
        assert_eq!(extract_candidate("command=Z"), "Z");
    }

    #[test]
    fn test_form_blank_values_are_skipped() {
        assert_eq!(extract_candidate("command="), "");
        assert_eq!(extract_candidate("command=&command=r"), "R");
        assert_eq!(extract_candidate("other=L"), "");
    }

    #[test]
    fn test_form_percent_decoding() {
        assert_eq!(extract_candidate("command=%6C"), "L");
        assert_eq!(extract_candidate("command=+L"), " L");
    }

    #[test]
    fn test_raw_text_is_trimmed() {
        assert_eq!(extract_candidate("l"), "L");
        assert_eq!(extract_candidate("  R\n"), "R");
        assert_eq!(extract_candidate(""), "");
        assert_eq!(extract_candidate("lr"), "LR");
    }

    #[test]
    fn test_broken_json_falls_back() {
        // Not valid JSON, contains '=' so it is read as a form.
        assert_eq!(extract_candidate("{command=L"), "");
        assert_eq!(extract_candidate("{\"command\":"), "{\"COMMAND\":");
    }
}

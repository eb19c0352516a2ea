//! Response-body decoding shared by every endpoint.
//!
//! The Python service serializes missing floats as bare `NaN` / `Infinity`
//! tokens, which strict JSON parsers reject. Those tokens are rewritten to
//! `null` before decoding; strings are left untouched.

use serde_json::Value;

use crate::error::{ClientError, ClientResult};

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

pub(crate) fn parse_lenient(body: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let rewritten = replace_non_finite(body);
            if rewritten == body {
                return Err(strict_err);
            }
            tracing::debug!("Response contained non-finite number tokens; decoding them as null");
            serde_json::from_str(&rewritten)
        }
    }
}

/// The `error` member of a JSON body, when it carries a non-empty string.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Like [`error_message`] but starting from a raw body that may not be JSON.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    parse_lenient(body).ok().as_ref().and_then(error_message)
}

/// Reads the whole body. The status line has already arrived at this point,
/// so a failure here is a broken response rather than a connection problem.
pub(crate) async fn read_body(response: reqwest::Response) -> ClientResult<String> {
    response
        .text()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to read response body: {}", e)))
}

fn replace_non_finite(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if !prev.is_some_and(|p| p.is_alphanumeric() || p == '_') {
            if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
                out.push_str("null");
                rest = &rest[token.len()..];
                prev = Some('l');
                continue;
            }
        }
        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_passes_through() {
        let value = parse_lenient(r#"{"a": 1.5, "b": "NaN"}"#).unwrap();
        assert_eq!(value, json!({"a": 1.5, "b": "NaN"}));
    }

    #[test]
    fn test_non_finite_tokens_become_null() {
        let body = r#"{"trailingPE": NaN, "x": [Infinity, -Infinity], "note": "NaN \"Infinity\""}"#;
        let value = parse_lenient(body).unwrap();
        assert_eq!(
            value,
            json!({"trailingPE": null, "x": [null, null], "note": "NaN \"Infinity\""})
        );
    }

    #[test]
    fn test_invalid_json_still_fails() {
        assert!(parse_lenient("<html>502 Bad Gateway</html>").is_err());
        assert!(parse_lenient(r#"{"a": NaNa}"#).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message_from_body(r#"{"error": "Invalid input."}"#),
            Some("Invalid input.".to_string())
        );
        assert_eq!(error_message_from_body(r#"{"error": "  "}"#), None);
        assert_eq!(error_message_from_body(r#"{"error": 42}"#), None);
        assert_eq!(error_message_from_body("Internal Server Error"), None);
    }
}

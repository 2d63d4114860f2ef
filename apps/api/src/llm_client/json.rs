//! Locates a JSON object inside free-form model output.
//!
//! Models are told to answer with bare JSON, but responses still arrive wrapped in
//! ```json fences, prefixed with "Here is the result:" or followed by commentary.
//! Nothing here assumes well-formed output: the scanner walks the text, tracks string
//! literals so braces inside them don't count, and only accepts a candidate once
//! `serde_json` agrees it is an object.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum JsonLocateError {
    #[error("no JSON object found in model response")]
    NoObject,

    #[error("JSON object in model response is truncated")]
    Truncated,
}

/// Parses the first balanced top-level JSON object in `text`.
pub fn parse_json_object(text: &str) -> Result<Value, JsonLocateError> {
    let candidate = locate(text)?;
    serde_json::from_str(candidate).map_err(|_| JsonLocateError::NoObject)
}

/// Returns the first balanced, parseable top-level JSON object in `text`.
///
/// A balanced candidate that fails to parse is skipped whole: objects nested inside
/// it are never offered as the answer. A `{` that never closes swallows the rest of
/// the text, so it ends the scan as `Truncated`.
fn locate(text: &str) -> Result<&str, JsonLocateError> {
    let mut from = 0;

    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        let len = balanced_end(&text[start..]).ok_or(JsonLocateError::Truncated)?;
        let candidate = &text[start..start + len];
        if matches!(serde_json::from_str::<Value>(candidate), Ok(Value::Object(_))) {
            return Ok(candidate);
        }
        from = start + len;
    }

    Err(JsonLocateError::NoObject)
}

/// Byte length of the brace-balanced prefix of `s` (which starts with `{`), if any.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

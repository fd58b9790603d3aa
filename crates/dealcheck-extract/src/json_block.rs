//! Locating the JSON object inside a free-form model reply.

use dealcheck_core::ExtractError;
use serde_json::{Map, Value};

/// Return the first balanced `{ ... }` block in `text` that parses as a JSON
/// object.
///
/// Braces inside string literals (including escaped quotes) do not count
/// towards nesting. A block that balances but does not parse is skipped and
/// scanning resumes just after its opening brace.
pub fn first_json_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let mut tried = 0usize;
    let mut from = 0;

    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(end) = balanced_end(text, start) {
            tried += 1;
            if let Ok(Value::Object(map)) = serde_json::from_str(&text[start..end]) {
                return Ok(map);
            }
        }
        from = start + 1;
    }

    Err(ExtractError::MalformedResponse(if tried == 0 {
        "no JSON object found in model reply".to_string()
    } else {
        format!("{tried} balanced block(s) found but none is a valid JSON object")
    }))
}

/// Byte index just past the brace closing the one at `start`, if any.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
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
                depth -= 1;
                if depth == 0 {
                    return Some(start + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

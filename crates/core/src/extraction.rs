//! Recovery of JSON payloads from free-text AI responses.
//!
//! Models frequently wrap their JSON answer in prose or code fences. The
//! extractors here take the outermost delimiter pair and try to parse the
//! substring, degrading to `None` / empty instead of erroring -- malformed
//! provider output must never fail a request outright; the caller decides
//! what a missing payload means for its flow.

use serde_json::{Map, Value};

/// Extract the first JSON object found in `text`.
///
/// Looks for the substring between the first `{` and the last `}`.
/// Returns `None` when no delimiters exist, the substring is not valid
/// JSON, or the parsed value is not an object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Extract the first JSON array found in `text`.
///
/// Looks for the substring between the first `[` and the last `]`.
/// Returns an empty vector when no delimiters exist, the substring is not
/// valid JSON, or the parsed value is not an array.
pub fn extract_json_array(text: &str) -> Vec<Value> {
    let Some(start) = text.find('[') else {
        return Vec::new();
    };
    let Some(end) = text.rfind(']') else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

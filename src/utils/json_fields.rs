//! Typed field access over untrusted JSON objects
//!
//! Model replies are duck-typed: a number may arrive as `"82"` or `"82%"`, a
//! list may arrive as a string, a field may be missing. These helpers read one
//! field and return `None` or a type-appropriate default instead of failing.

use serde_json::Value;

/// Borrow a string field.
pub fn get_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(|v| v.as_str())
}

/// Owned string field, empty when absent or not a string.
pub fn get_string(data: &Value, key: &str) -> String {
    get_str(data, key).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Owned string field exactly as given, empty when absent or not a string.
pub fn get_text(data: &Value, key: &str) -> String {
    get_str(data, key).map(str::to_string).unwrap_or_default()
}

/// Verbatim string field cut to at most `max_chars` characters.
/// Only whitespace exposed by a cut is trimmed, so a second pass is a no-op.
pub fn get_text_capped(data: &Value, key: &str, max_chars: usize) -> String {
    let text = get_str(data, key).unwrap_or_default();
    let cut = truncate_chars(text, max_chars);
    if cut.len() < text.len() {
        cut.trim_end().to_string()
    } else {
        cut
    }
}

/// Extract an f64 value.
/// Handles numeric JSON values and string-encoded numbers, with or without a
/// trailing percent sign.
pub fn get_f64(data: &Value, key: &str) -> Option<f64> {
    data.get(key).and_then(|v| {
        v.as_f64().or_else(|| {
            v.as_str()
                .and_then(|s| s.trim().trim_end_matches('%').trim().parse::<f64>().ok())
        })
    })
    .filter(|n| n.is_finite())
}

/// Percentage field clamped to `0..=100`, `0` when absent or invalid.
pub fn get_percent(data: &Value, key: &str) -> f64 {
    get_f64(data, key).map(|n| n.clamp(0.0, 100.0)).unwrap_or(0.0)
}

/// Boolean field, `false` when absent or invalid.
/// Accepts `"true"`/`"false"` strings.
pub fn get_bool(data: &Value, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Array field, empty slice when absent or not an array.
pub fn get_array<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(|v| v.as_array())
        .map(|a| a.as_slice())
        .unwrap_or(&[])
}

/// Object field, `None` when absent or not an object.
pub fn get_object<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| v.is_object())
}

/// List of strings, at most `max_items` long.
/// Non-string and blank members are skipped before the cap is applied.
pub fn get_str_list(data: &Value, key: &str, max_items: usize) -> Vec<String> {
    get_array(data, key)
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(max_items)
        .map(|s| s.to_string())
        .collect()
}

/// Verbatim string members, at most `max_items` long.
/// Non-string members are skipped before the cap is applied.
pub fn get_text_list(data: &Value, key: &str, max_items: usize) -> Vec<String> {
    get_array(data, key)
        .iter()
        .filter_map(|v| v.as_str())
        .take(max_items)
        .map(str::to_string)
        .collect()
}

/// Truncate on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

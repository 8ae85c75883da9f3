//! # Text Processing Utilities
//!
//! Helpers for rendering JSON values as text and shortening text for previews and logs.
//! Truncation always counts characters, never bytes, so multi-byte input is never split.

use serde::Serialize;
use serde_json::Value;

/// Returns at most `max_chars` characters of `input`.
///
/// # Example
/// ```rust
/// use sandbox_util::truncate_chars;
///
/// assert_eq!(truncate_chars("hello world", 5), "hello");
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 100), "short");
/// ```
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &input[..byte_index],
        None => input,
    }
}

/// Renders a JSON value as plain text.
///
/// Strings are returned without quotes; every other value uses its compact JSON form,
/// so the number `42` becomes `"42"` and `null` becomes `"null"`.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Compact JSON rendering of `value`, cut to `max_chars` characters.
pub fn json_preview<T: Serialize + ?Sized>(value: &T, max_chars: usize) -> String {
    let rendered = serde_json::to_string(value).unwrap_or_default();
    truncate_chars(&rendered, max_chars).to_string()
}

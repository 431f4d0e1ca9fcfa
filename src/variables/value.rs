//! Stringification of resolved JSON values.
//!
//! Placeholder substitution and response extraction both need a textual form
//! of whatever a path expression resolved to. This module is the single place
//! that decides what that text looks like.

use serde_json::Value as JsonValue;

/// Converts a JSON value to its textual representation.
///
/// # Logic
///
/// - Strings: returned as-is (without quotes)
/// - Numbers and booleans: their JSON text
/// - Objects and arrays: compact JSON
/// - Null: empty string
///
/// # Examples
///
/// ```
/// use requester::variables::value_to_string;
/// use serde_json::json;
///
/// assert_eq!(value_to_string(&json!("Ann")), "Ann");
/// assert_eq!(value_to_string(&json!(42)), "42");
/// assert_eq!(value_to_string(&json!([1, 2])), "[1,2]");
/// ```
pub fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        // Display for Value is compact JSON and cannot fail
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

/// Returns `true` when a lookup result counts as absent.
pub fn is_absent(value: Option<&JsonValue>) -> bool {
    matches!(value, None | Some(JsonValue::Null))
}

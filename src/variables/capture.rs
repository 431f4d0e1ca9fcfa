//! Extraction of named values from a decoded response.
//!
//! A descriptor maps output names to path expressions:
//!
//! ```json
//! "parseResponseValue": {
//!     "token": "data.access_token",
//!     "firstId": "data.items[0].id"
//! }
//! ```
//!
//! Every requested name appears in the result. Paths that do not resolve
//! (or resolve to `null`) produce an empty string rather than an error, so a
//! partially populated response never aborts a workflow.

use super::path::resolve;
use super::value::value_to_string;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Evaluates each path in `paths` against `response`.
///
/// # Arguments
///
/// * `response` - The decoded response tree
/// * `paths` - Output name -> path expression
///
/// # Returns
///
/// One entry per key of `paths`: the stringified value, or `""` when the path
/// is missing or `null`.
///
/// # Examples
///
/// ```
/// use requester::variables::extract_values;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let response = json!({"x": {"y": "v"}});
/// let paths = HashMap::from([
///     ("a".to_string(), "x.y".to_string()),
///     ("b".to_string(), "z".to_string()),
/// ]);
///
/// let values = extract_values(&response, &paths);
/// assert_eq!(values["a"], "v");
/// assert_eq!(values["b"], "");
/// ```
pub fn extract_values(
    response: &JsonValue,
    paths: &HashMap<String, String>,
) -> HashMap<String, String> {
    paths
        .iter()
        .map(|(name, path)| {
            let value = resolve(response, path)
                .map(value_to_string)
                .unwrap_or_default();
            (name.clone(), value)
        })
        .collect()
}

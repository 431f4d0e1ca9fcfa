//! Path expression evaluation over JSON trees.
//!
//! A path expression addresses a value inside nested objects and arrays:
//!
//! ```text
//! user.address.city
//! items[0].id
//! items.0.id
//! headers['X-Trace-Id']
//! config.api\.example\.com.token
//! ```
//!
//! Segments are separated by unescaped dots. A backslash makes the next
//! character literal, so `\.` is a dot that belongs to the key. Lookups never
//! fail loudly: anything that cannot be resolved evaluates to `None`.

use super::value::is_absent;
use serde_json::Value as JsonValue;

/// A single step in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key, or array index when the key is numeric and the current
    /// value is an array (e.g., "user", "0")
    Field(String),

    /// Bracketed array index (e.g., [0], [5])
    ArrayIndex(usize),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathExpr {
    segments: Vec<PathSegment>,
}

impl PathExpr {
    /// Parses a path expression. Parsing never fails; malformed bracket
    /// contents are treated as keys.
    ///
    /// # Examples
    ///
    /// - "user.name" -> [Field("user"), Field("name")]
    /// - "items[0].id" -> [Field("items"), ArrayIndex(0), Field("id")]
    /// - "a\.b.c" -> [Field("a.b"), Field("c")]
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    // Escaped character is always literal; a trailing
                    // backslash is kept as-is
                    match chars.next() {
                        Some(next_ch) => current.push(next_ch),
                        None => current.push('\\'),
                    }
                }
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    }

                    let mut inner = String::new();
                    let mut closed = false;
                    while let Some(next_ch) = chars.next() {
                        if next_ch == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(next_ch);
                    }

                    if !closed {
                        // Unterminated bracket: treat the rest as a literal key
                        current.push('[');
                        current.push_str(&inner);
                        continue;
                    }

                    segments.push(parse_bracket(inner.trim()));
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Field(current));
        }

        Self { segments }
    }

    /// The parsed segments, in evaluation order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Evaluates the expression against `data`.
    ///
    /// Returns `None` when a key is missing, an index is out of bounds or the
    /// path descends into a scalar. JSON `null` values are returned as
    /// `Some(Value::Null)`; see [`resolve`] for the null-as-absent variant.
    pub fn evaluate<'a>(&self, data: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = data;

        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Field(name), JsonValue::Object(map)) => map.get(name)?,
                (PathSegment::Field(name), JsonValue::Array(items)) => {
                    items.get(name.parse::<usize>().ok()?)?
                }
                (PathSegment::ArrayIndex(index), JsonValue::Array(items)) => items.get(*index)?,
                (PathSegment::ArrayIndex(index), JsonValue::Object(map)) => {
                    map.get(&index.to_string())?
                }
                _ => return None,
            };
        }

        Some(current)
    }
}

impl From<&str> for PathExpr {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Parses the inside of a `[...]` segment.
fn parse_bracket(inner: &str) -> PathSegment {
    if let Ok(index) = inner.parse::<usize>() {
        return PathSegment::ArrayIndex(index);
    }

    let quoted = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')));

    PathSegment::Field(quoted.unwrap_or(inner).to_string())
}

/// Looks up `path` in `data`, returning JSON `null` as a present value.
pub fn lookup<'a>(data: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    PathExpr::parse(path).evaluate(data)
}

/// Looks up `path` in `data`, treating JSON `null` the same as a missing value.
///
/// # Examples
///
/// ```
/// use requester::variables::resolve;
/// use serde_json::json;
///
/// let data = json!({"user": {"name": "Ann", "nick": null}});
/// assert_eq!(resolve(&data, "user.name"), Some(&json!("Ann")));
/// assert_eq!(resolve(&data, "user.nick"), None);
/// assert_eq!(resolve(&data, "user.age"), None);
/// ```
pub fn resolve<'a>(data: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let value = lookup(data, path);
    if is_absent(value) {
        None
    } else {
        value
    }
}

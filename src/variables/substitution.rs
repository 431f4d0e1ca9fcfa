//! Placeholder substitution engine.
//!
//! This module replaces placeholder tokens in arbitrary text with values looked
//! up from a JSON tree. The token syntax is not fixed: callers supply a regular
//! expression whose first capture group yields the lookup key, so `{id}`,
//! `${id}` and `:id` styles all work through the same resolver.
//!
//! Substitution is best-effort. A token whose key does not resolve (or
//! resolves to `null`) is left in the output exactly as it appeared.
//!
//! # Examples
//!
//! ```
//! use requester::variables::replace_placeholders;
//! use serde_json::json;
//!
//! let data = json!({"name": "Ann", "id": 42});
//! let text = replace_placeholders(&data, "hello {name}, id={id}", r"\{(\w+)\}", false).unwrap();
//! assert_eq!(text, "hello Ann, id=42");
//! ```

use super::path::resolve;
use super::value::value_to_string;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

/// Default placeholder syntax: `{key}` where the key may contain dots.
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = r"\{(\w[\w.]*)\}";

/// Cached compiled default pattern.
static DEFAULT_RESOLVER: Lazy<PlaceholderResolver> = Lazy::new(|| PlaceholderResolver {
    pattern: Regex::new(DEFAULT_PLACEHOLDER_PATTERN)
        .expect("Failed to compile default placeholder regex"),
});

/// Errors raised while preparing a placeholder pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern is not a valid regular expression.
    #[error("invalid placeholder pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The pattern compiled but has no capture group to yield a key.
    #[error("placeholder pattern has no capture group: {0}")]
    MissingCaptureGroup(String),
}

/// Locates placeholder tokens with a compiled pattern and resolves them.
///
/// Capture group 1 of each match is the lookup key. Matches are processed
/// left to right and never overlap.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    pattern: Regex,
}

impl PlaceholderResolver {
    /// Compiles `pattern` into a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidRegex`] if the pattern does not compile
    /// and [`PatternError::MissingCaptureGroup`] if it has no capture group.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::from_regex(Regex::new(pattern)?)
    }

    /// Wraps an already compiled regex.
    pub fn from_regex(pattern: Regex) -> Result<Self, PatternError> {
        // captures_len includes the implicit whole-match group
        if pattern.captures_len() < 2 {
            return Err(PatternError::MissingCaptureGroup(pattern.as_str().to_string()));
        }
        Ok(Self { pattern })
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Replaces every token in `text` with the value its key resolves to in
    /// `data`.
    ///
    /// When `escape_dots` is set, dots in the key are escaped before lookup so
    /// `{a.b}` addresses the single key `"a.b"` instead of the nested path
    /// `a` -> `b`.
    ///
    /// Tokens whose key is missing or `null` are left unchanged.
    pub fn replace(&self, data: &JsonValue, text: &str, escape_dots: bool) -> String {
        self.replace_with(text, |key| {
            let resolved = if escape_dots {
                resolve(data, &key.replace('.', "\\."))
            } else {
                resolve(data, key)
            };
            resolved.map(value_to_string)
        })
    }

    /// Replaces every token in `text` with its value from a flat string map.
    ///
    /// Keys are matched literally, so `{user.id}` reads the entry `"user.id"`.
    pub fn replace_flat(&self, values: &HashMap<String, String>, text: &str) -> String {
        self.replace_with(text, |key| values.get(key).cloned())
    }

    /// Replaces every token in `text` using a caller-supplied lookup.
    ///
    /// `lookup` receives the raw key from capture group 1. Returning `None`
    /// leaves the token unchanged.
    pub fn replace_with<F>(&self, text: &str, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut result = String::with_capacity(text.len());
        let mut last_match_end = 0;

        for cap in self.pattern.captures_iter(text) {
            let Some(full_match) = cap.get(0) else {
                continue;
            };

            result.push_str(&text[last_match_end..full_match.start()]);

            match participating_key(&cap).and_then(&mut lookup) {
                Some(value) => result.push_str(&value),
                None => result.push_str(full_match.as_str()),
            }

            last_match_end = full_match.end();
        }

        result.push_str(&text[last_match_end..]);
        result
    }

    /// Collects the key of every token in `text`, in match order.
    ///
    /// Duplicates are preserved. A capture group that did not take part in a
    /// match contributes an empty key.
    pub fn keys(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .map(|cap| cap.get(1).map_or_else(String::new, |m| m.as_str().to_string()))
            .collect()
    }
}

impl Default for PlaceholderResolver {
    /// Resolver for [`DEFAULT_PLACEHOLDER_PATTERN`].
    fn default() -> Self {
        DEFAULT_RESOLVER.clone()
    }
}

/// Capture group 1, if it took part in the match.
fn participating_key<'t>(cap: &Captures<'t>) -> Option<&'t str> {
    cap.get(1).map(|m| m.as_str())
}

/// Replaces placeholder tokens in `text` with values resolved from `data`.
///
/// Compiles `pattern` on every call; reuse a [`PlaceholderResolver`] when
/// substituting many strings with the same pattern.
pub fn replace_placeholders(
    data: &JsonValue,
    text: &str,
    pattern: &str,
    escape_dots: bool,
) -> Result<String, PatternError> {
    Ok(PlaceholderResolver::new(pattern)?.replace(data, text, escape_dots))
}

/// Lists the keys of all placeholder tokens in `text`, in order, duplicates
/// included.
///
/// # Examples
///
/// ```
/// use requester::variables::search_placeholders;
///
/// let keys = search_placeholders("/users/{id}/posts/{post}?by={id}", r"\{(\w+)\}").unwrap();
/// assert_eq!(keys, vec!["id", "post", "id"]);
/// ```
pub fn search_placeholders(text: &str, pattern: &str) -> Result<Vec<String>, PatternError> {
    Ok(PlaceholderResolver::new(pattern)?.keys(text))
}

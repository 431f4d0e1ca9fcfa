//! Execution result data models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A decoded JSON object response.
pub type JsonObject = Map<String, JsonValue>;

/// The outcome of a successful request execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executed<T> {
    /// Decoded response body.
    pub response: T,

    /// Equivalent curl command, captured when debugging was requested.
    pub curl: Option<String>,
}

impl<T> Executed<T> {
    /// Creates a new execution result.
    pub fn new(response: T, curl: Option<String>) -> Self {
        Self { response, curl }
    }

    /// Maps the decoded response, keeping the curl command.
    pub fn map<U, F>(self, f: F) -> Executed<U>
    where
        F: FnOnce(T) -> U,
    {
        Executed {
            response: f(self.response),
            curl: self.curl,
        }
    }

    /// Returns the response and curl command as a tuple.
    pub fn into_parts(self) -> (T, Option<String>) {
        (self.response, self.curl)
    }
}

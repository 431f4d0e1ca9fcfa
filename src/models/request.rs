//! Request descriptor data models.
//!
//! This module defines the declarative description of a single HTTP request:
//! target, method, headers, query parameters, body template and the rules for
//! extracting values from the response.

use crate::variables::extract_values;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// HTTP request method.
///
/// Only the five methods below can be executed. Any other value read from a
/// descriptor is kept in `Other` and rejected when the request is dispatched.
/// The default is the empty method, so a descriptor without one never
/// reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// Any other method name, kept verbatim
    Other(String),
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::Other(name) => name,
        }
    }

    /// Parses a method name.
    ///
    /// Matching is exact: `"get"` is not `GET` and becomes `Other("get")`.
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => HttpMethod::GET,
            "POST" => HttpMethod::POST,
            "PUT" => HttpMethod::PUT,
            "DELETE" => HttpMethod::DELETE,
            "PATCH" => HttpMethod::PATCH,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    /// Returns `true` if the method can be executed.
    pub fn is_supported(&self) -> bool {
        !matches!(self, HttpMethod::Other(_))
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::Other(String::new())
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        HttpMethod::parse(&s)
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        HttpMethod::parse(s)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declarative description of one HTTP request.
///
/// Serializes to and from JSON with the field names `url`, `method`,
/// `headers`, `params`, `body`, `bodyParam` and `parseResponseValue`. Missing
/// or `null` maps and body read as empty.
///
/// # Examples
///
/// ```
/// use requester::models::{HttpMethod, Requester};
///
/// let requester: Requester = serde_json::from_str(r#"{
///     "url": "https://api.example.com/users",
///     "method": "POST",
///     "headers": {"Authorization": "Bearer abc"},
///     "params": null,
///     "body": "{\"name\": \"{{ name }}\"}",
///     "bodyParam": {"name": "Ann"},
///     "parseResponseValue": {"id": "data.id"}
/// }"#).unwrap();
///
/// assert_eq!(requester.method, HttpMethod::POST);
/// assert!(requester.params.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Target URL. Query parameters from `params` are appended to it.
    pub url: String,

    /// HTTP method. Missing or `null` reads as the empty, unsupported method.
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: HttpMethod,

    /// Request headers. Applied after the default JSON content type, so a
    /// `Content-Type` entry here overrides it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,

    /// Query parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: HashMap<String, String>,

    /// Raw body, or a template when `body_param` is non-empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,

    /// Template variables for rendering `body`.
    #[serde(
        rename = "bodyParam",
        default,
        deserialize_with = "null_as_default"
    )]
    pub body_param: HashMap<String, String>,

    /// Output name -> path expression evaluated against the response.
    #[serde(
        rename = "parseResponseValue",
        default,
        deserialize_with = "null_as_default"
    )]
    pub parse_response_value: HashMap<String, String>,
}

impl Requester {
    /// Creates a descriptor from all of its parts.
    pub fn new(
        url: impl Into<String>,
        method: HttpMethod,
        headers: HashMap<String, String>,
        params: HashMap<String, String>,
        body: impl Into<String>,
        body_param: HashMap<String, String>,
        parse_response_value: HashMap<String, String>,
    ) -> Self {
        Self {
            url: url.into(),
            method,
            headers,
            params,
            body: body.into(),
            body_param,
            parse_response_value,
        }
    }

    /// Creates a descriptor with only a method and URL.
    pub fn with_url(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the body (or body template).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a body template variable.
    pub fn body_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body_param.insert(name.into(), value.into());
        self
    }

    /// Adds a response extraction rule.
    pub fn extract(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.parse_response_value.insert(name.into(), path.into());
        self
    }

    /// Checks if the body will be rendered as a template.
    pub fn has_body_template(&self) -> bool {
        !self.body.is_empty() && !self.body_param.is_empty()
    }

    /// Extracts the configured values from a decoded response.
    ///
    /// Every key of `parse_response_value` is present in the result; paths
    /// that do not resolve map to an empty string.
    pub fn parse_response(&self, response: &JsonValue) -> HashMap<String, String> {
        extract_values(response, &self.parse_response_value)
    }
}

/// Deserializes JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

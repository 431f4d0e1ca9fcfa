//! HTTP request execution configuration.
//!
//! This module defines the per-call execution options and builds the
//! `reqwest::Client` that executions share.

use crate::config::{get_config, RequesterConfig};
use crate::executor::error::RequestError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single HTTP request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request deadline in milliseconds.
    pub timeout_ms: u64,

    /// Capture a curl command for the request.
    pub debug: bool,
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout and debug flag.
    pub fn new(timeout_ms: u64, debug: bool) -> Self {
        Self { timeout_ms, debug }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Creates an ExecutionConfig from the global configuration.
    pub fn from_global_config() -> Self {
        Self::from(&get_config())
    }
}

impl Default for ExecutionConfig {
    /// Reads timeout and debug from the global configuration.
    fn default() -> Self {
        Self::from_global_config()
    }
}

impl From<&RequesterConfig> for ExecutionConfig {
    fn from(config: &RequesterConfig) -> Self {
        Self {
            timeout_ms: config.timeout,
            debug: config.debug,
        }
    }
}

/// Builds a `reqwest::Client` from `config`.
///
/// Applies the timeout, redirect policy, certificate validation and default
/// headers.
pub fn build_client(config: &RequesterConfig) -> Result<reqwest::Client, RequestError> {
    let redirect = if config.follow_redirects {
        Policy::limited(config.max_redirects as usize)
    } else {
        Policy::none()
    };

    reqwest::Client::builder()
        .timeout(config.timeout_duration())
        .redirect(redirect)
        .danger_accept_invalid_certs(!config.validate_ssl)
        .default_headers(header_map(&config.default_headers)?)
        .build()
        .map_err(|e| RequestError::Build(e.to_string()))
}

/// Converts string pairs into a `HeaderMap`, rejecting invalid names or values.
pub(crate) fn header_map<'a, I>(headers: I) -> Result<HeaderMap, RequestError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        insert_header(&mut map, name, value)?;
    }
    Ok(map)
}

/// Inserts one header, replacing any existing value under the same name.
pub(crate) fn insert_header(
    map: &mut HeaderMap,
    name: &str,
    value: &str,
) -> Result<(), RequestError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| RequestError::Build(format!("invalid header name '{}': {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| RequestError::Build(format!("invalid value for header '{}': {}", name, e)))?;

    map.insert(header_name, header_value);
    Ok(())
}

//! Configuration schema for requester.
//!
//! This module defines the configuration structure and validation logic for
//! the HTTP client and placeholder settings.

use crate::variables::{PatternError, PlaceholderResolver, DEFAULT_PLACEHOLDER_PATTERN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure.
///
/// Read from the "requester" key of a settings document or from a standalone
/// JSON file. Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterConfig {
    /// Request timeout in milliseconds.
    ///
    /// Applied both to the HTTP client and to the per-request deadline.
    /// Defaults to 30000ms (30 seconds). Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to automatically follow HTTP redirects.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    ///
    /// Only used when `follow_redirects` is true. Defaults to 10.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// **Warning:** Disabling SSL validation can expose you to security risks.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Render a curl command for every executed request.
    #[serde(default)]
    pub debug: bool,

    /// Placeholder syntax used by callers that substitute values into URLs.
    ///
    /// Must compile and contain at least one capture group.
    #[serde(default = "default_placeholder_pattern")]
    pub placeholder_pattern: String,

    /// Headers sent with every request.
    ///
    /// Installed on the client, so per-request headers override them.
    #[serde(default = "default_headers")]
    pub default_headers: HashMap<String, String>,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            debug: false,
            placeholder_pattern: default_placeholder_pattern(),
            default_headers: default_headers(),
        }
    }
}

impl RequesterConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        // max_redirects can be 0 (no redirects), so no validation needed

        self.resolver()
            .map_err(|e| format!("placeholderPattern is invalid: {}", e))?;

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout)
    }

    /// Compiles the configured placeholder pattern.
    pub fn resolver(&self) -> Result<PlaceholderResolver, PatternError> {
        PlaceholderResolver::new(&self.placeholder_pattern)
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// Default headers are combined, with `other` winning on conflicts.
    /// Header names are compared case-insensitively.
    pub fn merge(&self, other: &RequesterConfig) -> Self {
        let mut default_headers = self.default_headers.clone();
        for (name, value) in &other.default_headers {
            default_headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            default_headers.insert(name.clone(), value.clone());
        }

        Self {
            timeout: other.timeout,
            follow_redirects: other.follow_redirects,
            max_redirects: other.max_redirects,
            validate_ssl: other.validate_ssl,
            debug: other.debug,
            placeholder_pattern: other.placeholder_pattern.clone(),
            default_headers,
        }
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_placeholder_pattern() -> String {
    DEFAULT_PLACEHOLDER_PATTERN.to_string()
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "User-Agent".to_string(),
        concat!("requester/", env!("CARGO_PKG_VERSION")).to_string(),
    );
    headers
}

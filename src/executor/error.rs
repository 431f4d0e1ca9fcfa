//! HTTP request execution error types.
//!
//! This module defines error types that can occur while preparing, sending
//! and decoding a request. Every failure is reported to the caller as-is;
//! nothing is retried.

use thiserror::Error;

/// Errors that can occur during HTTP request execution.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Rendering the body template failed.
    #[error("template render error: {0}")]
    TemplateRender(#[from] minijinja::Error),

    /// The descriptor's method is not one of GET, POST, PUT, DELETE, PATCH.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Invalid URL provided in the request.
    ///
    /// The URL could not be parsed or does not use http/https.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request building error.
    ///
    /// Invalid header names or values, or a request reqwest refused to build.
    #[error("request build error: {0}")]
    Build(String),

    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors, TLS errors
    /// and failures while reading the response body.
    #[error("network error: {0}")]
    Transport(String),

    /// The context deadline passed, or the client timeout fired.
    #[error("request timed out")]
    Timeout,

    /// The context was cancelled before the request completed.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered with a status other than 200.
    ///
    /// Displays as the raw response body.
    #[error("{body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Full response body text.
        body: String,
    },

    /// The response body is not valid JSON for the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// HTTP status code for [`RequestError::Status`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the request was cancelled or timed out.
    pub fn is_aborted(&self) -> bool {
        matches!(self, RequestError::Cancelled | RequestError::Timeout)
    }
}

/// Convert reqwest errors to RequestError.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::Build(err.to_string())
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}

/// Convert URL parsing errors to RequestError.
impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}

/// A failed execution, together with the debug command captured before the
/// failure (if any).
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ExecutionError {
    /// curl command rendered before the failure, when debugging was enabled
    /// and the request got far enough to be built.
    pub curl: Option<String>,

    /// What went wrong.
    #[source]
    pub source: RequestError,
}

impl ExecutionError {
    /// Creates an execution error.
    pub fn new(source: RequestError, curl: Option<String>) -> Self {
        Self { curl, source }
    }

    /// The underlying error.
    pub fn kind(&self) -> &RequestError {
        &self.source
    }

    /// Splits into the underlying error and captured curl command.
    pub fn into_parts(self) -> (RequestError, Option<String>) {
        (self.source, self.curl)
    }
}

impl From<RequestError> for ExecutionError {
    fn from(source: RequestError) -> Self {
        Self { curl: None, source }
    }
}

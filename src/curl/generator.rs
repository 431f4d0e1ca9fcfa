//! cURL command generator.
//!
//! This module renders a fully built `reqwest::Request` as an equivalent cURL
//! command. Rendering happens after headers, query parameters and body are in
//! place and before the request is sent, so the command reflects exactly what
//! goes on the wire.

use reqwest::{Method, Request};

/// Generates a single-line cURL command for `request`.
///
/// # Arguments
///
/// * `request` - The built request about to be executed
///
/// # Returns
///
/// A cURL command string: method (unless GET), headers sorted by name, body
/// and finally the URL including its query string.
///
/// # Examples
///
/// ```
/// use requester::curl::generate_curl_command;
/// use reqwest::{Method, Request, Url};
///
/// let request = Request::new(Method::DELETE, Url::parse("https://api.example.com/users/1").unwrap());
/// assert_eq!(
///     generate_curl_command(&request),
///     "curl -X DELETE https://api.example.com/users/1"
/// );
/// ```
pub fn generate_curl_command(request: &Request) -> String {
    command_parts(request).join(" ")
}

fn command_parts(request: &Request) -> Vec<String> {
    let mut parts = vec!["curl".to_string()];

    // Add method if not GET
    if request.method() != Method::GET {
        parts.push("-X".to_string());
        parts.push(request.method().as_str().to_string());
    }

    // Add headers in order (sorted for consistency)
    let mut headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    headers.sort();

    for (name, value) in headers {
        parts.push("-H".to_string());
        parts.push(escape_shell_arg(&format!("{}: {}", name, value)));
    }

    // Streaming bodies have no bytes to show
    if let Some(bytes) = request.body().and_then(|body| body.as_bytes()) {
        parts.push("-d".to_string());
        parts.push(escape_shell_arg(&String::from_utf8_lossy(bytes)));
    }

    // Add URL (always last)
    parts.push(escape_shell_arg(request.url().as_str()));

    parts
}

/// Escapes a string for safe use in shell commands.
///
/// Uses single quotes for safety, escaping any embedded single quotes.
fn escape_shell_arg(arg: &str) -> String {
    if needs_quoting(arg) {
        // Replace ' with '\''
        format!("'{}'", arg.replace('\'', "'\\''"))
    } else {
        arg.to_string()
    }
}

/// Checks if a string needs quoting for shell safety.
fn needs_quoting(s: &str) -> bool {
    let special_chars = [
        ' ', '\t', '\n', '\r', '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*',
        '?', '[', ']', '#', '~', '=', '%', '{', '}', '!',
    ];

    s.is_empty() || s.chars().any(|c| special_chars.contains(&c))
}

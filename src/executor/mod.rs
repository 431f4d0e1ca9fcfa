//! HTTP request executor.
//!
//! This module turns a [`Requester`] descriptor into a single HTTP round trip
//! using `reqwest`. A call builds the header map, renders the body template,
//! dispatches on the method, optionally captures a curl command, sends the
//! request under a [`RequestContext`] and decodes the JSON response.
//!
//! Only a `200 OK` response is decoded. Any other status is an error whose
//! message is the response body.

pub mod cancellation;
pub mod config;
pub mod error;

pub use cancellation::RequestContext;
pub use config::{build_client, ExecutionConfig};
pub use error::{ExecutionError, RequestError};

use crate::curl::generate_curl_command;
use crate::models::request::{HttpMethod, Requester};
use crate::models::response::{Executed, JsonObject};
use crate::template::render_body;
use config::insert_header;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

/// Executes `requester` and decodes the response body into `T`.
///
/// When `debug` is set, the outgoing request is rendered as a curl command
/// before it is sent. The command is returned on success and attached to the
/// error on failure, as long as the request got far enough to be built.
///
/// # Examples
///
/// ```no_run
/// use requester::executor::{execute, RequestContext};
/// use requester::models::{HttpMethod, Requester};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::new();
/// let ctx = RequestContext::new().with_timeout(Duration::from_secs(10));
///
/// let requester = Requester::with_url(HttpMethod::GET, "https://httpbin.org/json");
/// let executed = execute::<serde_json::Value>(&requester, &client, &ctx, true).await?;
///
/// println!("{}", executed.curl.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub async fn execute<T>(
    requester: &Requester,
    client: &Client,
    ctx: &RequestContext,
    debug: bool,
) -> Result<Executed<T>, ExecutionError>
where
    T: DeserializeOwned,
{
    let mut curl = None;
    match execute_internal(requester, client, ctx, debug, &mut curl).await {
        Ok(response) => Ok(Executed::new(response, curl)),
        Err(source) => {
            debug!(error = %source, "request failed");
            Err(ExecutionError::new(source, curl))
        }
    }
}

/// Executes `requester` with a deadline and debug flag taken from `config`.
pub async fn execute_request(
    requester: &Requester,
    client: &Client,
    config: &ExecutionConfig,
) -> Result<Executed<JsonValue>, ExecutionError> {
    let ctx = RequestContext::new().with_timeout(config.timeout_duration());
    requester.request(client, &ctx, config.debug).await
}

impl Requester {
    /// Executes the descriptor, expecting a JSON object in response.
    ///
    /// A response that is valid JSON but not an object fails with
    /// [`RequestError::Decode`].
    pub async fn request(
        &self,
        client: &Client,
        ctx: &RequestContext,
        debug: bool,
    ) -> Result<Executed<JsonValue>, ExecutionError> {
        let executed = execute::<JsonObject>(self, client, ctx, debug).await?;
        Ok(executed.map(JsonValue::Object))
    }
}

async fn execute_internal<T>(
    requester: &Requester,
    client: &Client,
    ctx: &RequestContext,
    debug: bool,
    curl: &mut Option<String>,
) -> Result<T, RequestError>
where
    T: DeserializeOwned,
{
    // Check if request was cancelled before starting
    if ctx.is_cancelled() {
        return Err(RequestError::Cancelled);
    }

    let request = build_request(requester, client)?;

    if debug {
        let command = generate_curl_command(&request);
        trace!(curl = %command, "captured curl command");
        *curl = Some(command);
    }

    debug!(method = %request.method(), url = %request.url(), "sending request");

    let (status, text) = ctx
        .run(async {
            let response = client.execute(request).await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, RequestError>((status, text))
        })
        .await?;

    debug!(status = status.as_u16(), bytes = text.len(), "response received");

    if status != StatusCode::OK {
        return Err(RequestError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}

/// Builds the `reqwest::Request` for `requester` without sending it.
///
/// `Content-Type: application/json` is always set first, so a caller header
/// with the same name replaces it.
pub fn build_request(
    requester: &Requester,
    client: &Client,
) -> Result<reqwest::Request, RequestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &requester.headers {
        insert_header(&mut headers, name, value)?;
    }

    let body = request_body(requester)?;
    let method = to_reqwest_method(&requester.method)?;
    validate_url(&requester.url)?;

    let mut builder = client.request(method, &requester.url).headers(headers);
    if !requester.params.is_empty() {
        builder = builder.query(&requester.params);
    }
    if !body.is_empty() {
        builder = builder.body(body);
    }

    Ok(builder.build()?)
}

/// Renders the body template, or returns the body verbatim when there are no
/// body variables.
fn request_body(requester: &Requester) -> Result<String, RequestError> {
    if requester.has_body_template() {
        Ok(render_body(&requester.body, &requester.body_param)?)
    } else {
        Ok(requester.body.clone())
    }
}

fn to_reqwest_method(method: &HttpMethod) -> Result<Method, RequestError> {
    match method {
        HttpMethod::GET => Ok(Method::GET),
        HttpMethod::POST => Ok(Method::POST),
        HttpMethod::PUT => Ok(Method::PUT),
        HttpMethod::DELETE => Ok(Method::DELETE),
        HttpMethod::PATCH => Ok(Method::PATCH),
        HttpMethod::Other(name) => Err(RequestError::UnsupportedMethod(name.clone())),
    }
}

/// Validates that the URL is well-formed and uses a supported protocol.
fn validate_url(url: &str) -> Result<(), RequestError> {
    let parsed = url::Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::InvalidUrl(format!(
            "only HTTP and HTTPS are supported, got: {}",
            scheme
        )));
    }

    Ok(())
}

//! Declarative HTTP requests with JSON responses.
//!
//! A [`Requester`] describes one HTTP call: method, URL, headers, query
//! parameters, an optional body template with its variables, and a set of
//! path expressions to pull values out of the JSON response. Executing it
//! performs exactly one round trip.
//!
//! # Architecture
//!
//! - **models**: The request descriptor and execution results
//! - **variables**: Placeholder substitution, path expressions and response value extraction
//! - **template**: Body rendering with minijinja and helper functions
//! - **executor**: Builds and sends requests with reqwest, with cancellation and deadlines
//! - **curl**: Renders outgoing requests as curl commands for debugging
//! - **config**: Client and placeholder settings
//!
//! # Request chaining
//!
//! Values extracted from one response can be substituted into the next
//! request's URL:
//!
//! ```no_run
//! use requester::{replace_placeholders, HttpMethod, RequestContext, Requester};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let ctx = RequestContext::new();
//!
//! let login = Requester::with_url(HttpMethod::POST, "https://api.example.com/login")
//!     .body(r#"{"user": "{{ user }}"}"#)
//!     .body_param("user", "ann")
//!     .extract("id", "data.user.id");
//!
//! let executed = login.request(&client, &ctx, false).await?;
//! let values = serde_json::to_value(login.parse_response(&executed.response))?;
//!
//! let url = replace_placeholders(
//!     &values,
//!     "https://api.example.com/users/{id}",
//!     r"\{(\w+)\}",
//!     false,
//! )?;
//! let profile = Requester::with_url(HttpMethod::GET, url);
//! let _ = profile.request(&client, &ctx, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod curl;
pub mod executor;
pub mod models;
pub mod template;
pub mod variables;

pub use config::{get_config, load_config, load_config_file, ConfigError, RequesterConfig};
pub use executor::{
    build_client, execute, execute_request, ExecutionConfig, ExecutionError, RequestContext,
    RequestError,
};
pub use models::{Executed, HttpMethod, JsonObject, Requester};
pub use variables::{
    extract_values, replace_placeholders, search_placeholders, PatternError,
    PlaceholderResolver, DEFAULT_PLACEHOLDER_PATTERN,
};

//! Helper functions and filters available to body templates.
//!
//! # Functions
//!
//! - `uuidv4()` - random UUID v4
//! - `now()` / `now(format)` - current UTC time, RFC 3339 or a chrono format
//! - `randInt(min, max)` - random integer in `min..max`
//! - `env(name)` - process environment variable, empty if unset
//!
//! # Filters
//!
//! - `b64enc` / `b64dec` - standard base64
//! - `quote` - JSON string literal, quotes included
//! - `trimAll(chars)` - strip any of `chars` from both ends

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SecondsFormat, Utc};
use minijinja::{Environment, Error, ErrorKind};
use rand::Rng;
use std::fmt::Write as _;

/// Registers all helpers on `env`.
pub fn register(env: &mut Environment<'static>) {
    env.add_function("uuidv4", uuidv4);
    env.add_function("now", now);
    env.add_function("randInt", rand_int);
    env.add_function("env", env_var);

    env.add_filter("b64enc", b64enc);
    env.add_filter("b64dec", b64dec);
    env.add_filter("quote", quote);
    env.add_filter("trimAll", trim_all);
}

fn uuidv4() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now(format: Option<String>) -> Result<String, Error> {
    let now = Utc::now();
    match format {
        None => Ok(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Some(format) => {
            // Invalid chrono specifiers surface as fmt::Error, not a panic
            let mut out = String::new();
            write!(out, "{}", now.format(&format)).map_err(|_| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("invalid time format: {}", format),
                )
            })?;
            Ok(out)
        }
    }
}

fn rand_int(min: i64, max: i64) -> Result<i64, Error> {
    if min >= max {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("randInt requires min < max, got {} and {}", min, max),
        ));
    }
    Ok(rand::thread_rng().gen_range(min..max))
}

fn env_var(name: String) -> String {
    std::env::var(name).unwrap_or_default()
}

fn b64enc(value: String) -> String {
    STANDARD.encode(value.as_bytes())
}

fn b64dec(value: String) -> Result<String, Error> {
    let bytes = STANDARD.decode(value.as_bytes()).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, format!("invalid base64: {}", e))
    })?;
    String::from_utf8(bytes).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("decoded base64 is not UTF-8: {}", e),
        )
    })
}

fn quote(value: String) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, format!("cannot quote value: {}", e))
    })
}

fn trim_all(value: String, chars: String) -> String {
    value.trim_matches(|c| chars.contains(c)).to_string()
}

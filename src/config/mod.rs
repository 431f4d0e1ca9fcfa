//! Configuration management for requester.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from the "requester" key of a settings document, or from a standalone
//! JSON file, and merged with defaults.

pub mod schema;

pub use schema::RequesterConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;
use tracing::warn;

/// Key under which settings documents carry requester configuration.
pub const SETTINGS_KEY: &str = "requester";

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated when settings change.
static CONFIG: Lazy<RwLock<RequesterConfig>> =
    Lazy::new(|| RwLock::new(RequesterConfig::default()));

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a settings document.
///
/// This function reads the "requester" settings, merges them with defaults,
/// validates the result, and updates the global configuration. Settings that
/// fail to deserialize are ignored with a warning.
///
/// # Example
///
/// ```
/// use requester::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "requester": {
///         "timeout": 60000,
///         "validateSsl": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// # requester::config::reset_config();
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<RequesterConfig, ConfigError> {
    let mut config = RequesterConfig::default();

    if let Some(user_settings) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<RequesterConfig>(user_settings.clone()) {
            Ok(user_config) => {
                config = config.merge(&user_config);
            }
            Err(e) => {
                warn!(error = %e, "failed to parse requester settings, using defaults");
            }
        }
    }

    store(config)
}

/// Loads configuration from a JSON file holding a [`RequesterConfig`] object.
///
/// Unlike [`load_config`], a file that does not parse is an error.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<RequesterConfig, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let user_config: RequesterConfig = serde_json::from_str(&content)?;

    store(RequesterConfig::default().merge(&user_config))
}

fn store(config: RequesterConfig) -> Result<RequesterConfig, ConfigError> {
    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// If configuration has not been loaded yet, returns the default configuration.
pub fn get_config() -> RequesterConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| RequesterConfig::default())
}

/// Updates the global configuration in place.
///
/// If the updated configuration does not validate, it is reverted to defaults.
///
/// # Example
///
/// ```
/// use requester::config::{get_config, update_config, reset_config};
///
/// update_config(|config| {
///     config.debug = true;
/// });
/// assert!(get_config().debug);
/// # reset_config();
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut RequesterConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!(error = %e, "configuration invalid after update, reverting to defaults");
            *config = RequesterConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = RequesterConfig::default();
    }
}

//! Configuration management for the resolver.
//!
//! Settings are read from a JSON settings object under the `"rq"` key and
//! merged with defaults. There is no global instance: the loaded
//! [`ResolverConfig`] is handed to each cascade resolver and engine.

pub mod schema;

pub use schema::{ConfigError, ResolverConfig};

use log::warn;
use serde_json::Value;

/// Settings key the resolver configuration lives under.
pub const SETTINGS_KEY: &str = "rq";

/// Loads configuration from a JSON settings value.
///
/// User settings found under `"rq"` are merged over the defaults and the
/// result is validated. Settings that fail to deserialize are ignored with a
/// warning; settings that deserialize but are invalid are an error.
///
/// # Example
///
/// ```
/// use rq_core::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({ "rq": { "maxNestingDepth": 8 } });
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.max_nesting_depth, 8);
/// assert_eq!(config.scope_file_name, ".env");
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ResolverConfig, ConfigError> {
    let mut config = ResolverConfig::default();

    if let Some(user_settings) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<ResolverConfig>(user_settings.clone()) {
            Ok(user_config) => config = config.merge(&user_config),
            Err(e) => warn!("failed to parse rq settings: {}; using defaults", e),
        }
    }

    config.validate()?;
    Ok(config)
}

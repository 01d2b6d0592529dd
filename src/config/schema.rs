//! Configuration schema for the resolver.
//!
//! This module defines the settings shared by the cascade resolver and the
//! template engine, together with their defaults and validation rules.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by [`ResolverConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The scope file name is empty or contains a path separator.
    #[error("scopeFileName must be a plain, non-empty file name, got '{0}'")]
    InvalidScopeFileName(String),

    /// The default timestamp format is not a valid strftime string.
    #[error("defaultTimestampFormat is not a valid strftime format: '{0}'")]
    InvalidTimestampFormat(String),

    /// Nesting depth of zero would reject every function call.
    #[error("maxNestingDepth must be greater than 0")]
    ZeroNestingDepth,
}

/// Settings for scope loading and template evaluation.
///
/// Every field has a default, so an empty JSON object deserializes to
/// [`ResolverConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Name of the per-directory scope file. Defaults to `.env`.
    ///
    /// Environment overlays are named `<scopeFileName>.<environment>`.
    #[serde(default = "default_scope_file_name")]
    pub scope_file_name: String,

    /// strftime format used by `timestamp()` and `now()` when called
    /// without arguments. Defaults to RFC 3339 with second precision.
    #[serde(default = "default_timestamp_format")]
    pub default_timestamp_format: String,

    /// Maximum nesting of function calls inside one placeholder.
    ///
    /// Defaults to 32. Must be > 0.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Directory that relative paths passed to `file()` and `sha256()` are
    /// resolved against. When unset, the process working directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_base_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            scope_file_name: default_scope_file_name(),
            default_timestamp_format: default_timestamp_format(),
            max_nesting_depth: default_max_nesting_depth(),
            file_base_dir: None,
        }
    }
}

impl ResolverConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.scope_file_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidScopeFileName(name.to_string()));
        }

        if !is_valid_strftime(&self.default_timestamp_format) {
            return Err(ConfigError::InvalidTimestampFormat(
                self.default_timestamp_format.clone(),
            ));
        }

        if self.max_nesting_depth == 0 {
            return Err(ConfigError::ZeroNestingDepth);
        }

        Ok(())
    }

    /// Merges this configuration with another, preferring values from `other`
    /// wherever they differ from the defaults.
    pub fn merge(&self, other: &ResolverConfig) -> Self {
        let defaults = ResolverConfig::default();

        Self {
            scope_file_name: if other.scope_file_name != defaults.scope_file_name {
                other.scope_file_name.clone()
            } else {
                self.scope_file_name.clone()
            },
            default_timestamp_format: if other.default_timestamp_format
                != defaults.default_timestamp_format
            {
                other.default_timestamp_format.clone()
            } else {
                self.default_timestamp_format.clone()
            },
            max_nesting_depth: if other.max_nesting_depth != defaults.max_nesting_depth {
                other.max_nesting_depth
            } else {
                self.max_nesting_depth
            },
            file_base_dir: other
                .file_base_dir
                .clone()
                .or_else(|| self.file_base_dir.clone()),
        }
    }
}

/// Returns true when chrono can format with `format` without error.
pub(crate) fn is_valid_strftime(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

fn default_scope_file_name() -> String {
    ".env".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%dT%H:%M:%S%:z".to_string()
}

fn default_max_nesting_depth() -> usize {
    32
}

//! Scope file loader
//!
//! Scope files are line-oriented `KEY=VALUE` files. Blank lines and lines
//! starting with `#` are ignored, the first `=` separates key from value, and
//! both sides are trimmed. A missing file is an empty scope.

use super::models::Scope;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading scope files
#[derive(Debug, Error)]
pub enum EnvError {
    /// A scope file exists but could not be read
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-comment line has no `=` separator
    #[error("invalid format in '{}' at line {line}: missing '=' character", .path.display())]
    InvalidFormat { path: PathBuf, line: usize },

    /// A line has nothing before its `=` separator
    #[error("empty key in '{}' at line {line}", .path.display())]
    EmptyKey { path: PathBuf, line: usize },

    /// The relative path escapes the workspace root
    #[error("invalid relative path '{}': must stay inside the workspace", .0.display())]
    InvalidPath(PathBuf),

    /// The environment name cannot be used as a file suffix
    #[error("invalid environment name '{0}'")]
    InvalidEnvironmentName(String),
}

impl EnvError {
    /// Returns the 1-based line number for per-line errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            EnvError::InvalidFormat { line, .. } | EnvError::EmptyKey { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns the scope file associated with this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EnvError::Io { path, .. }
            | EnvError::InvalidFormat { path, .. }
            | EnvError::EmptyKey { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Loads one scope file.
///
/// # Returns
///
/// * `Ok(Scope)` - Parsed variables, or an empty scope if the file does not exist
/// * `Err(EnvError)` - If the file cannot be read or is malformed
pub fn load_scope(path: &Path) -> Result<Scope, EnvError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Scope::empty(path));
        }
        Err(source) => {
            return Err(EnvError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let variables = parse_scope(&content, path)?;
    debug!(
        "loaded {} variable(s) from {}",
        variables.len(),
        path.display()
    );

    Ok(Scope::with_variables(path, variables))
}

/// Parses scope file content. `path` is only used for error reporting.
pub fn parse_scope(content: &str, path: &Path) -> Result<HashMap<String, String>, EnvError> {
    let mut variables = HashMap::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| EnvError::InvalidFormat {
            path: path.to_path_buf(),
            line: index + 1,
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(EnvError::EmptyKey {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }

        variables.insert(key.to_string(), value.trim().to_string());
    }

    Ok(variables)
}

/// Validates an environment name used as an overlay suffix.
///
/// Valid names:
/// - Are non-empty and do not start with `.`
/// - Contain only letters, digits, underscores, hyphens or dots
pub fn is_valid_environment_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

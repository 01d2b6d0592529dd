//! Error types for template resolution.

use super::registry::Arity;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing or evaluating placeholders
#[derive(Debug, Error)]
pub enum VarError {
    /// Expression text does not follow the placeholder grammar.
    ///
    /// `position` is the byte offset into the expression.
    #[error("invalid syntax at offset {position}: {message}")]
    InvalidSyntax { position: usize, message: String },

    /// Variable is not defined in the environment mapping
    #[error("variable '{0}' not found")]
    UndefinedVariable(String),

    /// Function called with the wrong number of arguments
    #[error("{function}() expects {expected}, got {got}")]
    Arity {
        function: String,
        expected: Arity,
        got: usize,
    },

    /// No function is registered under this name
    #[error("function '{0}' does not exist")]
    FunctionNotFound(String),

    /// A function with this name is already registered
    #[error("function '{0}' is already registered")]
    DuplicateFunction(String),

    /// A function callback failed
    #[error("{function}() failed: {source}")]
    FunctionExecution {
        function: String,
        #[source]
        source: FunctionError,
    },

    /// The template file could not be read
    #[error("failed to read template '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A placeholder failed; wraps the underlying cause with the raw
    /// expression text
    #[error("failed to resolve '{{{{{expression}}}}}': {source}")]
    Placeholder {
        expression: String,
        #[source]
        source: Box<VarError>,
    },
}

impl VarError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        VarError::InvalidSyntax {
            position,
            message: message.into(),
        }
    }

    /// Returns the innermost error, looking through [`VarError::Placeholder`].
    pub fn root_cause(&self) -> &VarError {
        match self {
            VarError::Placeholder { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors returned by function callbacks
#[derive(Debug, Error)]
pub enum FunctionError {
    /// A file argument does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A file argument exists but could not be read
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A time format argument is not a valid strftime string
    #[error("invalid time format '{0}'")]
    InvalidFormat(String),

    /// Free-form failure, for functions registered by callers
    #[error("{0}")]
    Custom(String),
}

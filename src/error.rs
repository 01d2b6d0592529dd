//! Crate-level error type.

use crate::config::ConfigError;
use crate::environment::EnvError;
use crate::variables::VarError;
use thiserror::Error;

/// Any failure from loading configuration, resolving the cascade or
/// substituting a template.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Environment(#[from] EnvError),

    #[error(transparent)]
    Variable(#[from] VarError),
}

pub type Result<T> = std::result::Result<T, Error>;

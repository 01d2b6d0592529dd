//! Built-in template functions
//!
//! Implements `uuid()`, `file()`, `sha256()`, `timestamp()` / `now()`,
//! `base64()` and `join()`. Only `file()` and `sha256()` touch the
//! filesystem.

use super::error::{FunctionError, VarError};
use super::registry::{Arity, FunctionRegistry};
use crate::config::schema::is_valid_strftime;
use crate::config::ResolverConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Local;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Registers every built-in function into `registry`.
///
/// `config` supplies the default timestamp format and the base directory for
/// relative file arguments.
pub fn register_builtins(
    registry: &mut FunctionRegistry,
    config: &ResolverConfig,
) -> Result<(), VarError> {
    let base_dir = config.file_base_dir.clone();
    let default_format = config.default_timestamp_format.clone();

    registry.register("uuid", Arity::Exactly(0), |_| Ok(generate_uuid()))?;

    let dir = base_dir.clone();
    registry.register("file", Arity::Exactly(1), move |args| {
        encode_file(&resolve_path(dir.as_deref(), &args[0]))
    })?;

    let dir = base_dir;
    registry.register("sha256", Arity::Exactly(1), move |args| {
        sha256_digest(&args[0], dir.as_deref())
    })?;

    for name in ["timestamp", "now"] {
        let default_format = default_format.clone();
        registry.register(name, Arity::Between(0, 1), move |args| {
            let format = args.first().unwrap_or(&default_format);
            format_timestamp(format)
        })?;
    }

    registry.register("base64", Arity::Exactly(1), |args| {
        Ok(STANDARD.encode(args[0].as_bytes()))
    })?;

    registry.register("join", Arity::AtLeast(2), |args| Ok(join_args(args)))?;

    Ok(())
}

/// Generates a new random v4 UUID
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Reads `path` and returns its content as standard base64
pub fn encode_file(path: &Path) -> Result<String, FunctionError> {
    let content = read_file(path)?;
    Ok(STANDARD.encode(content))
}

/// Hashes the file named by `input` if it exists, otherwise `input` itself.
///
/// Returns the lowercase hex SHA-256 digest.
pub fn sha256_digest(input: &str, base_dir: Option<&Path>) -> Result<String, FunctionError> {
    let path = resolve_path(base_dir, input);

    let digest = if !input.is_empty() && path.is_file() {
        Sha256::digest(read_file(&path)?)
    } else {
        Sha256::digest(input.as_bytes())
    };

    Ok(format!("{:x}", digest))
}

/// Formats the current local time with a strftime `format`
pub fn format_timestamp(format: &str) -> Result<String, FunctionError> {
    if !is_valid_strftime(format) {
        return Err(FunctionError::InvalidFormat(format.to_string()));
    }

    let mut formatted = String::new();
    write!(formatted, "{}", Local::now().format(format))
        .map_err(|_| FunctionError::InvalidFormat(format.to_string()))?;
    Ok(formatted)
}

/// Joins all arguments but the last, using the last as separator.
///
/// Callers guarantee at least two arguments.
pub fn join_args(args: &[String]) -> String {
    match args.split_last() {
        Some((separator, parts)) => parts.join(separator.as_str()),
        None => String::new(),
    }
}

fn resolve_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    match base_dir {
        Some(dir) => dir.join(path),
        None => PathBuf::from(path),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, FunctionError> {
    fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FunctionError::FileNotFound(path.to_path_buf())
        } else {
            FunctionError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

//! Workspace-level operations
//!
//! These functions tie the cascade resolver and the template engine together
//! for the callers that sit above this crate: the request runner resolves a
//! request file before sending it, and the environment commands list and
//! show the configuration visible from a directory.
//!
//! Paths passed here are relative to the workspace root.

use crate::config::ResolverConfig;
use crate::environment::CascadeResolver;
use crate::error::Result;
use crate::variables::Engine;
use log::debug;
use std::path::{Path, PathBuf};

/// One merged variable and the scope file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentEntry {
    pub key: String,
    pub value: String,
    /// Scope file that supplied the value, relative to the workspace root
    pub origin: PathBuf,
}

/// Resolves a request file inside a workspace.
///
/// The cascade is resolved for the directory containing `request`, then the
/// file's placeholders are substituted against it.
///
/// # Arguments
///
/// * `root` - Workspace root
/// * `request` - Request file path relative to `root`
/// * `environment` - Optional environment overlay name
/// * `config` - Resolver settings
///
/// # Example
///
/// ```no_run
/// use rq_core::commands::resolve_request;
/// use rq_core::config::ResolverConfig;
/// use std::path::Path;
///
/// let text = resolve_request(
///     Path::new("/path/to/dock"),
///     "users/create.http",
///     Some("staging"),
///     &ResolverConfig::default(),
/// )
/// .unwrap();
/// println!("{}", text);
/// ```
pub fn resolve_request(
    root: &Path,
    request: impl AsRef<Path>,
    environment: Option<&str>,
    config: &ResolverConfig,
) -> Result<String> {
    let request = request.as_ref();
    let directory = request.parent().unwrap_or_else(|| Path::new(""));

    let mapping = CascadeResolver::with_config(root, config).resolve(directory, environment)?;
    debug!(
        "resolving {} with {} variable(s)",
        request.display(),
        mapping.len()
    );

    let engine = Engine::with_config(mapping, config);
    Ok(engine.resolve_file(root.join(request))?)
}

/// Lists every scope and overlay file in the workspace, relative to `root`.
pub fn list_environment_files(root: &Path, config: &ResolverConfig) -> Result<Vec<PathBuf>> {
    let files = CascadeResolver::with_config(root, config).list_scope_files()?;

    Ok(files
        .into_iter()
        .map(|path| relative_to(root, path))
        .collect())
}

/// Returns the merged configuration visible from `directory`, sorted by key,
/// with the scope file each value came from.
pub fn show_environment(
    root: &Path,
    directory: impl AsRef<Path>,
    environment: Option<&str>,
    config: &ResolverConfig,
) -> Result<Vec<EnvironmentEntry>> {
    let cascade = CascadeResolver::with_config(root, config).load_cascade(directory, environment)?;

    let mut entries: Vec<EnvironmentEntry> = cascade
        .merge()
        .into_iter()
        .filter_map(|(key, value)| {
            let origin = relative_to(root, cascade.origin_of(&key)?.to_path_buf());
            Some(EnvironmentEntry { key, value, origin })
        })
        .collect();

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}

fn relative_to(root: &Path, path: PathBuf) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}

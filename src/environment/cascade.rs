//! Configuration cascade resolution
//!
//! Builds the directory sequence `[root, root/a, root/a/b, ...]` from a
//! relative path, loads the scope file of each directory in that order and
//! merges them, deeper scopes overriding shallower ones. An optional
//! environment overlay from the deepest directory is merged last.
//!
//! Scope order comes from the path segments alone, never from directory
//! listing, so the result does not depend on filesystem enumeration order.

use super::loader::{is_valid_environment_name, load_scope, EnvError};
use super::models::Cascade;
use crate::config::ResolverConfig;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves merged configuration for paths inside one workspace
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    root: PathBuf,
    scope_file_name: String,
}

impl CascadeResolver {
    /// Creates a resolver for `root` using the default `.env` scope file name
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, &ResolverConfig::default())
    }

    /// Creates a resolver for `root` using the scope file name from `config`
    pub fn with_config(root: impl Into<PathBuf>, config: &ResolverConfig) -> Self {
        Self {
            root: root.into(),
            scope_file_name: config.scope_file_name.clone(),
        }
    }

    /// The workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directories whose scopes apply to `relative_path`, root first.
    ///
    /// Empty and `.` segments are skipped. `..`, absolute paths and drive
    /// prefixes are rejected.
    pub fn scope_directories(&self, relative_path: &Path) -> Result<Vec<PathBuf>, EnvError> {
        let mut directories = vec![self.root.clone()];
        let mut current = self.root.clone();

        for component in relative_path.components() {
            match component {
                Component::Normal(segment) => {
                    current.push(segment);
                    directories.push(current.clone());
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(EnvError::InvalidPath(relative_path.to_path_buf()));
                }
            }
        }

        Ok(directories)
    }

    /// Loads every scope that applies to `relative_path`, unmerged.
    ///
    /// # Arguments
    ///
    /// * `relative_path` - Directory path relative to the workspace root
    /// * `environment` - Optional overlay name; `None` or `""` means no overlay
    ///
    /// # Returns
    ///
    /// The ordered [`Cascade`], or the first load error encountered. No
    /// partial cascade is returned on error.
    pub fn load_cascade(
        &self,
        relative_path: impl AsRef<Path>,
        environment: Option<&str>,
    ) -> Result<Cascade, EnvError> {
        let environment = environment.filter(|name| !name.is_empty());
        if let Some(name) = environment {
            if !is_valid_environment_name(name) {
                return Err(EnvError::InvalidEnvironmentName(name.to_string()));
            }
        }

        let directories = self.scope_directories(relative_path.as_ref())?;

        let scopes = directories
            .iter()
            .map(|dir| load_scope(&dir.join(&self.scope_file_name)))
            .collect::<Result<Vec<_>, _>>()?;

        let overlay = match (environment, directories.last()) {
            (Some(name), Some(deepest)) => {
                let file_name = format!("{}.{}", self.scope_file_name, name);
                Some(load_scope(&deepest.join(file_name))?)
            }
            _ => None,
        };

        Ok(Cascade { scopes, overlay })
    }

    /// Resolves the merged mapping for `relative_path`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rq_core::environment::CascadeResolver;
    ///
    /// let resolver = CascadeResolver::new("/path/to/dock");
    /// let mapping = resolver.resolve("users/admin", Some("staging")).unwrap();
    /// println!("{:?}", mapping.get("BASE_URL"));
    /// ```
    pub fn resolve(
        &self,
        relative_path: impl AsRef<Path>,
        environment: Option<&str>,
    ) -> Result<HashMap<String, String>, EnvError> {
        let relative_path = relative_path.as_ref();
        let mapping = self.load_cascade(relative_path, environment)?.merge();

        debug!(
            "resolved {} key(s) for '{}' (environment: {})",
            mapping.len(),
            relative_path.display(),
            environment.unwrap_or("-")
        );

        Ok(mapping)
    }

    /// Lists every scope and overlay file under the workspace root, sorted.
    pub fn list_scope_files(&self) -> Result<Vec<PathBuf>, EnvError> {
        let mut files = Vec::new();
        self.collect_scope_files(&self.root, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Returns the sorted names of every environment that has an overlay file
    /// somewhere in the workspace.
    pub fn environments(&self) -> Result<Vec<String>, EnvError> {
        let prefix = format!("{}.", self.scope_file_name);

        let names: BTreeSet<String> = self
            .list_scope_files()?
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .filter_map(|name| name.strip_prefix(&prefix))
            .map(str::to_string)
            .collect();

        Ok(names.into_iter().collect())
    }

    fn collect_scope_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), EnvError> {
        let io_error = |source: io::Error| EnvError::Io {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let file_type = entry.file_type().map_err(io_error)?;
            let path = entry.path();

            if file_type.is_dir() {
                self.collect_scope_files(&path, files)?;
            } else if self.is_scope_file_name(&entry.file_name().to_string_lossy()) {
                files.push(path);
            }
        }

        Ok(())
    }

    fn is_scope_file_name(&self, name: &str) -> bool {
        match name.strip_prefix(self.scope_file_name.as_str()) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('.')
                .is_some_and(is_valid_environment_name),
            None => false,
        }
    }
}

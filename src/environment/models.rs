//! Scope and cascade data models
//!
//! A [`Scope`] is the key/value content of one scope file. A [`Cascade`] is
//! the ordered list of scopes from the workspace root down to a target
//! directory, plus an optional environment overlay.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Variables loaded from a single scope file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Path of the scope file (which may not exist)
    pub path: PathBuf,

    /// Key-value pairs defined by this file
    pub variables: HashMap<String, String>,
}

impl Scope {
    /// Creates an empty scope for `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            variables: HashMap::new(),
        }
    }

    /// Creates a scope with the given variables
    pub fn with_variables(path: impl Into<PathBuf>, variables: HashMap<String, String>) -> Self {
        Self {
            path: path.into(),
            variables,
        }
    }

    /// Gets a variable value by name
    pub fn get(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    /// Returns the number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the scope defines no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Ordered scopes for one resolution request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cascade {
    /// Directory scopes, workspace root first
    pub scopes: Vec<Scope>,

    /// Environment overlay, applied after every directory scope
    pub overlay: Option<Scope>,
}

impl Cascade {
    /// Creates an empty cascade
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over every scope in merge order
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().chain(self.overlay.iter())
    }

    /// Merges all scopes into one mapping; later scopes win.
    pub fn merge(&self) -> HashMap<String, String> {
        let mut merged = HashMap::new();
        for scope in self.iter() {
            merged.extend(
                scope
                    .variables
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }

    /// Returns the path of the scope file that supplies the merged value of
    /// `key`, or `None` if no scope defines it.
    pub fn origin_of(&self, key: &str) -> Option<&Path> {
        self.iter()
            .filter(|scope| scope.variables.contains_key(key))
            .last()
            .map(|scope| scope.path.as_path())
    }
}

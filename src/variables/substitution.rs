//! Template substitution engine
//!
//! This module replaces `{{expression}}` placeholders in request text with
//! their evaluated values. Resolution is all-or-nothing: every placeholder is
//! evaluated before any text is produced, and the first failure aborts the
//! whole call.
//!
//! Each distinct expression is evaluated once per call. Repeated
//! placeholders such as two `{{uuid()}}` spans therefore receive the same
//! value.

use super::error::{FunctionError, VarError};
use super::expression::{parse_expression, Expression};
use super::registry::{Arity, FunctionRegistry};
use super::system::register_builtins;
use crate::config::ResolverConfig;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Cached regex for `{{ expression }}` placeholders. The capture excludes
/// surrounding whitespace; placeholders do not span lines.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("Failed to compile placeholder regex"));

/// A placeholder found in template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte range of the whole `{{ ... }}` span
    pub span: Range<usize>,
    /// Trimmed expression text between the delimiters
    pub expression: &'a str,
}

/// Finds every placeholder in `text`, in order of appearance.
pub fn find_placeholders(text: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let body = cap.get(1)?;
            Some(Placeholder {
                span: whole.range(),
                expression: body.as_str().trim(),
            })
        })
        .collect()
}

/// Evaluates placeholders against one environment mapping.
///
/// The engine owns its mapping and its function registry. Built-in functions
/// are registered at construction; further functions can be added through
/// [`Engine::register`], which needs exclusive access and so cannot race
/// with evaluation.
#[derive(Debug, Clone)]
pub struct Engine {
    environment: HashMap<String, String>,
    registry: FunctionRegistry,
    max_depth: usize,
}

impl Engine {
    /// Creates an engine with the default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rq_core::variables::Engine;
    /// use std::collections::HashMap;
    ///
    /// let mut env = HashMap::new();
    /// env.insert("BASE_URL".to_string(), "https://api.example.com".to_string());
    ///
    /// let engine = Engine::new(env);
    /// let text = engine.resolve("GET {{ BASE_URL }}/users/{{join('a','b','-')}}").unwrap();
    /// assert_eq!(text, "GET https://api.example.com/users/a-b");
    /// ```
    pub fn new(environment: HashMap<String, String>) -> Self {
        Self::with_config(environment, &ResolverConfig::default())
    }

    /// Creates an engine whose built-ins follow `config`.
    pub fn with_config(environment: HashMap<String, String>, config: &ResolverConfig) -> Self {
        let mut registry = FunctionRegistry::new();
        // A fresh registry has no names to collide with.
        let _ = register_builtins(&mut registry, config);

        Self {
            environment,
            registry,
            max_depth: config.max_nesting_depth,
        }
    }

    /// The environment mapping this engine resolves variables from
    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    /// The function registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Registers an additional function.
    ///
    /// Fails if the name is already registered, including built-in names.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        arity: Arity,
        callback: F,
    ) -> Result<(), VarError>
    where
        F: Fn(&[String]) -> Result<String, FunctionError> + Send + Sync + 'static,
    {
        self.registry.register(name, arity, callback)
    }

    /// Parses and evaluates a single expression (without `{{ }}`).
    pub fn evaluate(&self, expression: &str) -> Result<String, VarError> {
        let parsed = parse_expression(expression, self.max_depth)?;
        self.evaluate_expression(&parsed)
    }

    /// Evaluates a parsed expression tree, arguments first.
    pub fn evaluate_expression(&self, expression: &Expression) -> Result<String, VarError> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(name) => self
                .environment
                .get(name)
                .cloned()
                .ok_or_else(|| VarError::UndefinedVariable(name.clone())),
            Expression::Call { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate_expression(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.registry.invoke(name, &values)
            }
        }
    }

    /// Substitutes every placeholder in `template`.
    ///
    /// # Returns
    ///
    /// The substituted text, or a [`VarError::Placeholder`] naming the first
    /// expression that failed. On error no substitution is performed.
    pub fn resolve(&self, template: &str) -> Result<String, VarError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }

        let placeholders = find_placeholders(template);

        let mut values: HashMap<&str, String> = HashMap::with_capacity(placeholders.len());
        for placeholder in &placeholders {
            if values.contains_key(placeholder.expression) {
                continue;
            }

            let value =
                self.evaluate(placeholder.expression)
                    .map_err(|source| VarError::Placeholder {
                        expression: placeholder.expression.to_string(),
                        source: Box::new(source),
                    })?;
            trace!("evaluated '{{{{{}}}}}'", placeholder.expression);
            values.insert(placeholder.expression, value);
        }

        let mut result = String::with_capacity(template.len() + template.len() / 4);
        let mut last_end = 0;
        for placeholder in &placeholders {
            result.push_str(&template[last_end..placeholder.span.start]);
            if let Some(value) = values.get(placeholder.expression) {
                result.push_str(value);
            }
            last_end = placeholder.span.end;
        }
        result.push_str(&template[last_end..]);

        debug!(
            "resolved {} placeholder(s), {} distinct",
            placeholders.len(),
            values.len()
        );

        Ok(result)
    }

    /// Reads `path` and substitutes its placeholders.
    pub fn resolve_file(&self, path: impl AsRef<Path>) -> Result<String, VarError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| VarError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        self.resolve(&content)
    }
}

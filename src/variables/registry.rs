//! Function registry for template expressions.
//!
//! Maps function names to callbacks. Each [`Engine`](super::Engine) owns its
//! own registry, so registrations never leak between engines.

use super::error::{FunctionError, VarError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with already-evaluated arguments.
pub type FunctionCallback =
    Arc<dyn Fn(&[String]) -> Result<String, FunctionError> + Send + Sync>;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Exactly(usize),
    /// Between `min` and `max` arguments, inclusive
    Between(usize, usize),
    /// `n` or more arguments
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` arguments satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match *self {
            Arity::Exactly(0) => write!(f, "no arguments"),
            Arity::Exactly(n) => write!(f, "exactly {} {}", n, plural(n)),
            Arity::Between(min, max) => write!(f, "between {} and {} arguments", min, max),
            Arity::AtLeast(n) => write!(f, "at least {} {}", n, plural(n)),
        }
    }
}

#[derive(Clone)]
struct Function {
    arity: Arity,
    callback: FunctionCallback,
}

/// Registered functions, keyed by name
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl FunctionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `name`.
    ///
    /// Fails with [`VarError::DuplicateFunction`] if the name is taken; the
    /// existing registration is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use rq_core::variables::{Arity, FunctionRegistry};
    ///
    /// let mut registry = FunctionRegistry::new();
    /// registry
    ///     .register("upper", Arity::Exactly(1), |args| Ok(args[0].to_uppercase()))
    ///     .unwrap();
    ///
    /// assert_eq!(registry.invoke("upper", &["abc".to_string()]).unwrap(), "ABC");
    /// assert!(registry.register("upper", Arity::Exactly(1), |_| Ok(String::new())).is_err());
    /// ```
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        arity: Arity,
        callback: F,
    ) -> Result<(), VarError>
    where
        F: Fn(&[String]) -> Result<String, FunctionError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(VarError::DuplicateFunction(name));
        }

        self.functions.insert(
            name,
            Function {
                arity,
                callback: Arc::new(callback),
            },
        );
        Ok(())
    }

    /// Checks if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns the arity of a registered function
    pub fn arity(&self, name: &str) -> Option<Arity> {
        self.functions.get(name).map(|function| function.arity)
    }

    /// Returns all registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes `name` with `args` after checking its arity.
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<String, VarError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| VarError::FunctionNotFound(name.to_string()))?;

        if !function.arity.accepts(args.len()) {
            return Err(VarError::Arity {
                function: name.to_string(),
                expected: function.arity,
                got: args.len(),
            });
        }

        (function.callback)(args).map_err(|source| VarError::FunctionExecution {
            function: name.to_string(),
            source,
        })
    }
}

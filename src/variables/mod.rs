//! Template expression engine
//!
//! This module resolves `{{expression}}` placeholders in request text. An
//! expression is a quoted literal, a variable looked up in the environment
//! mapping, or a (possibly nested) call to a registered function.

pub mod error;
pub mod expression;
pub mod registry;
pub mod substitution;
pub mod system;

pub use error::{FunctionError, VarError};
pub use expression::{parse_expression, Expression};
pub use registry::{Arity, FunctionCallback, FunctionRegistry};
pub use substitution::{find_placeholders, Engine, Placeholder};
pub use system::register_builtins;

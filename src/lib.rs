//! Configuration cascade and template engine for rq
//!
//! rq keeps API requests as plain text files inside a workspace directory
//! (a "dock"). Before a request is sent its `{{ ... }}` placeholders are
//! substituted with values from the workspace configuration. This crate
//! implements that substitution.
//!
//! # Architecture
//!
//! - **config**: Resolver settings (scope file name, timestamp format, limits)
//! - **environment**: Loads `.env` scope files from the workspace root down to
//!   a directory and merges them, with an optional `.env.<name>` overlay
//! - **variables**: Parses placeholder expressions and evaluates them against
//!   the merged mapping and a registry of functions
//! - **commands**: Workspace-level operations built on the two
//!
//! # Placeholders
//!
//! ```http
//! POST {{BASE_URL}}/uploads
//! X-Request-Id: {{uuid()}}
//! X-Signature: {{sha256(join(API_KEY, timestamp('%s'), ':'))}}
//! Authorization: Basic {{base64(join(USER, PASSWORD, ':'))}}
//!
//! {"avatar": "{{file('avatar.png')}}"}
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use rq_core::environment::CascadeResolver;
//! use rq_core::variables::Engine;
//!
//! let mapping = CascadeResolver::new("/path/to/dock")
//!     .resolve("users", Some("dev"))
//!     .unwrap();
//!
//! let engine = Engine::new(mapping);
//! let request = engine.resolve_file("/path/to/dock/users/create.http").unwrap();
//! println!("{}", request);
//! ```

pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod variables;

pub use config::{load_config, ResolverConfig};
pub use environment::{Cascade, CascadeResolver, EnvError, Scope};
pub use error::{Error, Result};
pub use variables::{Arity, Engine, Expression, FunctionError, FunctionRegistry, VarError};

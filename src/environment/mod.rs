//! Environment configuration for rq workspaces
//!
//! Every directory of a workspace may carry a `.env` scope file with
//! `KEY=VALUE` lines, and `.env.<environment>` overlay files for named
//! environments such as `dev` or `prod`. Resolving a path merges the scope
//! files from the workspace root down to that path, then the overlay.
//!
//! # Example
//!
//! ```no_run
//! use rq_core::environment::CascadeResolver;
//!
//! let resolver = CascadeResolver::new("/path/to/dock");
//! let cascade = resolver.load_cascade("users", Some("dev")).unwrap();
//!
//! for (key, value) in cascade.merge() {
//!     let origin = cascade.origin_of(&key).unwrap();
//!     println!("{key}={value} ({})", origin.display());
//! }
//! ```

pub mod cascade;
pub mod loader;
pub mod models;

pub use cascade::CascadeResolver;
pub use loader::{is_valid_environment_name, load_scope, parse_scope, EnvError};
pub use models::{Cascade, Scope};

//! modo-api: the simulated backend around [`modo_core`].
//!
//! Embeds the tree engine behind the surface a real HTTP API would
//! expose: typed request/response schemas, mock bearer-token auth with
//! a dev fallback, demo seed data, JSON snapshot persistence, and a
//! small TOML/env config layer.
//!
//! ```no_run
//! use modo_api::MockBackend;
//!
//! let backend = MockBackend::seeded();
//! let todos = backend.todos(None); // dev fallback user
//! assert!(!todos.is_empty());
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod persist;
pub mod schema;
pub mod seed;
pub mod service;

pub use config::BackendConfig;
pub use error::{ApiError, ErrorCode};
pub use service::MockBackend;

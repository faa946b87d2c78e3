//! modo-core: the hierarchical todo tree.
//!
//! An arbitrarily deep task tree stored flat: records carry a parent
//! pointer, a 1-based sibling order number, and a materialized ancestry
//! path. The crate splits into:
//!
//! - [`path`] — the pure path codec;
//! - [`store`] — the record arena with owner index (plain CRUD);
//! - [`engine`] — the operations engine maintaining order and path
//!   invariants under create, update, delete, reorder, and move;
//! - [`view`] — read-only projections (goals, subtrees, completion).
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`TreeError`]; nothing here
//!   panics on user input.
//! - **Logging**: `tracing` macros at mutation points.

pub mod engine;
pub mod error;
pub mod model;
pub mod path;
pub mod store;
pub mod view;

pub use error::TreeError;
pub use model::{NewTodo, TodoId, TodoPatch, TodoRecord, UserId};
pub use store::TreeStore;

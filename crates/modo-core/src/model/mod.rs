//! Domain records and identifiers.

pub mod ids;
pub mod todo;

pub use ids::{TodoId, UserId};
pub use todo::{NewTodo, TodoPatch, TodoRecord};

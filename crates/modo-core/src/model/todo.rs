use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TodoId, UserId};

/// All persisted fields for a todo record.
///
/// `path` and `order_number` are maintained by the operations engine
/// ([`crate::engine`]); the store persists them without interpretation.
/// For a root record `path` equals `order_number` rendered as a string;
/// for a child it is `parent.path + "." + parent.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub owner: UserId,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    /// `None` marks a root record (a "goal").
    pub parent_id: Option<TodoId>,
    pub path: String,
    /// 1-based position among siblings sharing `parent_id`.
    pub order_number: u32,
}

impl TodoRecord {
    /// A root record is a goal: the top level of an owner's hierarchy.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A record without an id, ready for [`TreeStore::insert`](crate::store::TreeStore::insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub owner: UserId,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub parent_id: Option<TodoId>,
    pub path: String,
    pub order_number: u32,
}

/// Partial update applied by [`TreeStore::update`](crate::store::TreeStore::update).
///
/// Only provided fields are overwritten. `parent_id` is a double option:
/// the outer level distinguishes "not provided" from "set", the inner one
/// carries the nullable value (`None` = make the record a root).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub parent_id: Option<Option<TodoId>>,
    pub path: Option<String>,
    pub order_number: Option<u32>,
}

impl TodoPatch {
    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.deadline.is_none()
            && self.parent_id.is_none()
            && self.path.is_none()
            && self.order_number.is_none()
    }

    /// Overwrite the provided fields on `record`.
    pub fn apply_to(&self, record: &mut TodoRecord) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            record.description.clone_from(description);
        }
        if let Some(completed) = self.completed {
            record.completed = completed;
        }
        if let Some(deadline) = self.deadline {
            record.deadline = deadline;
        }
        if let Some(parent_id) = self.parent_id {
            record.parent_id = parent_id;
        }
        if let Some(path) = &self.path {
            record.path.clone_from(path);
        }
        if let Some(order_number) = self.order_number {
            record.order_number = order_number;
        }
    }
}

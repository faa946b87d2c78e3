use std::fmt;

use crate::model::{TodoId, UserId};

/// Errors returned by the tree operations engine.
///
/// Every operation detects violations before the first store write, so a
/// returned error guarantees storage was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced todo id does not exist.
    NotFound(TodoId),
    /// The todo exists but does not belong to the acting owner.
    Unauthorized { id: TodoId, owner: UserId },
    /// The referenced parent does not exist or isn't owned by the acting owner.
    ParentNotFound(TodoId),
    /// The referenced move target does not exist.
    TargetParentNotFound(TodoId),
    /// The move would create a cycle: the target is the node itself or one
    /// of its descendants.
    InvalidMove { id: TodoId, target: TodoId },
    /// A reorder was requested over ids that are not an exact permutation of
    /// the claimed sibling set.
    InvalidSiblingSet { reason: &'static str },
    /// A required field is missing or malformed.
    Validation { reason: &'static str },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Unauthorized { id, owner } => {
                write!(f, "todo {id} does not belong to user {owner}")
            }
            Self::ParentNotFound(id) => write!(f, "parent todo not found: {id}"),
            Self::TargetParentNotFound(id) => write!(f, "target parent not found: {id}"),
            Self::InvalidMove { id, target } => write!(
                f,
                "cannot move todo {id} under {target}: target is the todo itself or one of its descendants"
            ),
            Self::InvalidSiblingSet { reason } => write!(f, "invalid sibling set: {reason}"),
            Self::Validation { reason } => write!(f, "validation failed: {reason}"),
        }
    }
}

impl std::error::Error for TreeError {}

//! Read-only projections of the record set into UI-facing shapes.
//!
//! Everything here operates on a caller-supplied slice of records — a
//! consistent snapshot, possibly filtered — and never touches the store
//! or raises domain errors. A record whose ancestry cannot be resolved
//! within the given slice (dangling parent, malformed path) is treated
//! as its own root rather than rejected, because callers routinely
//! project filtered subsets.

#![allow(clippy::must_use_candidate)]

use crate::model::{TodoId, TodoRecord};
use crate::path;

/// Default accent color for goals until records carry their own.
pub const DEFAULT_GOAL_COLOR: &str = "#EF4444";
/// Default icon name for goals until records carry their own.
pub const DEFAULT_GOAL_ICON: &str = "ri-flag-line";

/// A root todo projected as a goal tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: TodoId,
    pub title: String,
    pub color: String,
    pub icon: String,
}

/// Project the root records into goals, preserving the slice order.
pub fn to_goals(records: &[TodoRecord]) -> Vec<Goal> {
    records
        .iter()
        .filter(|record| record.is_root())
        .map(|record| Goal {
            id: record.id,
            title: record.title.clone(),
            color: DEFAULT_GOAL_COLOR.to_string(),
            icon: DEFAULT_GOAL_ICON.to_string(),
        })
        .collect()
}

/// The records directly under `parent_id` (one level), slice order.
pub fn direct_children(records: &[TodoRecord], parent_id: TodoId) -> Vec<&TodoRecord> {
    records
        .iter()
        .filter(|record| record.parent_id == Some(parent_id))
        .collect()
}

/// Resolve the goal (root) a record belongs to.
///
/// Roots are their own goal. For everything else the leading path
/// segment is a root order number; the root sibling holding that number
/// is the goal. Falls back to the record itself when the slice does not
/// contain such a root.
pub fn root_goal_id(records: &[TodoRecord], record: &TodoRecord) -> TodoId {
    if record.is_root() {
        return record.id;
    }
    path::leading_order_number(&record.path)
        .and_then(|order| {
            records
                .iter()
                .find(|candidate| candidate.is_root() && candidate.order_number == order)
        })
        .map_or(record.id, |root| root.id)
}

/// Every record in the subtree under the goal, excluding the goal itself.
pub fn all_descendants(records: &[TodoRecord], goal_id: TodoId) -> Vec<&TodoRecord> {
    records
        .iter()
        .filter(|record| !record.is_root() && root_goal_id(records, record) == goal_id)
        .collect()
}

/// Completion percentage over direct children only: `round(100 * done /
/// total)`, 0 for a childless node.
pub fn completion_percent(records: &[TodoRecord], node_id: TodoId) -> u8 {
    let children = direct_children(records, node_id);
    if children.is_empty() {
        return 0;
    }
    let done = children.iter().filter(|child| child.completed).count();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = ((done as f64 / children.len() as f64) * 100.0).round() as u8;
    percent
}

//! Materialized-path codec for the todo hierarchy.
//!
//! A record's ancestry is stored as a dot-delimited string:
//!
//! - a root's path is its own order number rendered as text (`"2"`);
//! - a child's path is `parent.path + "." + parent.id` (`"2.17"`).
//!
//! Children of the same parent therefore share one path string, and the
//! full set of strict descendants of a node `(path, id)` is exactly the
//! records whose path equals `path + "." + id` or extends it with a
//! further `"."` segment. All functions here are pure and total over
//! well-formed inputs; matching is segment-aware, so `"1.1"` never claims
//! `"1.12"` as a descendant.

use crate::model::TodoId;

/// Path of a root record: its order number as a string.
#[must_use]
pub fn root_path(order_number: u32) -> String {
    order_number.to_string()
}

/// Path of a child record: `parent.path + "." + parent.id`.
#[must_use]
pub fn child_path(parent_path: &str, parent_id: TodoId) -> String {
    format!("{parent_path}.{parent_id}")
}

/// True if `node_path` denotes a strict descendant of the node identified
/// by `(ancestor_path, ancestor_id)`.
///
/// Direct children carry exactly the ancestor's child prefix; deeper
/// descendants extend it segment by segment.
#[must_use]
pub fn is_ancestor_path(ancestor_path: &str, ancestor_id: TodoId, node_path: &str) -> bool {
    let prefix = child_path(ancestor_path, ancestor_id);
    match node_path.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Replace a leading `old_prefix` with `new_prefix`, preserving the
/// remainder of the path.
///
/// The rewrite only fires on a segment boundary; a path that does not
/// carry the prefix is returned unchanged. This is the primitive behind
/// the move operation's descendant cascade.
#[must_use]
pub fn rewrite_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    match path.strip_prefix(old_prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('.') => {
            format!("{new_prefix}{rest}")
        }
        _ => path.to_string(),
    }
}

/// Leading segment of a path, parsed as a root order number.
///
/// Returns `None` for malformed paths; callers treat that defensively
/// (the projection maps such records to their own root).
#[must_use]
pub fn leading_order_number(path: &str) -> Option<u32> {
    let head = path.split('.').next()?;
    head.parse().ok()
}

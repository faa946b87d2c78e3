//! Tree operations engine: the sole writer path over the store.
//!
//! Each public operation is one atomic transaction: it validates fully
//! against current state, mutates a snapshot of the owner's records, and
//! only then commits — a precondition failure never leaves a partial
//! write behind. The operations maintain three structural guarantees:
//!
//! - no record is ever its own ancestor (cycle checks on move);
//! - every sibling set stays a contiguous 1..N order sequence after any
//!   mutation, including the gaps left by delete and cross-parent move;
//! - stored paths always match `parent.path + "." + parent.id` (roots:
//!   the order number), which on root renumbering and on move requires
//!   rewriting the paths of every descendant of the changed node.
//!
//! The descendant cascade is a flat prefix rewrite over the owner
//! snapshot rather than a recursive walk, so depth never threatens the
//! stack.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::TreeError;
use crate::model::{NewTodo, TodoId, TodoPatch, TodoRecord, UserId};
use crate::path;
use crate::store::TreeStore;

// ---------------------------------------------------------------------------
// Operation inputs
// ---------------------------------------------------------------------------

/// Caller-facing fields for creating a todo. Ordering, path, and ownership
/// bookkeeping are computed here, never accepted from the caller.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    /// `None` creates a root record (a goal).
    pub parent_id: Option<TodoId>,
}

/// Caller-facing partial update.
///
/// `parent_id` is a double option: `Some(None)` moves the record to the
/// root level, `Some(Some(id))` under a new parent, `None` leaves the
/// parent untouched. A provided `order_number` is applied as a position
/// move within the sibling set, keeping the 1..N sequence intact.
#[derive(Debug, Clone, Default)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub order_number: Option<u32>,
    pub parent_id: Option<Option<TodoId>>,
}

// ---------------------------------------------------------------------------
// Public operations
// ---------------------------------------------------------------------------

/// Create a todo as a root (goal) or under an existing parent, appended
/// after its siblings. Returns the owner's full collection, id-ordered.
///
/// # Errors
///
/// [`TreeError::Validation`] on an empty title;
/// [`TreeError::ParentNotFound`] when the parent does not exist or is not
/// owned by `owner`.
pub fn create_todo(
    store: &mut TreeStore,
    owner: UserId,
    req: CreateTodo,
) -> Result<Vec<TodoRecord>, TreeError> {
    if req.title.trim().is_empty() {
        return Err(TreeError::Validation {
            reason: "title must not be empty",
        });
    }

    let (parent_id, new_path, order_number) = match req.parent_id {
        Some(pid) => {
            let parent = store
                .get(pid)
                .filter(|p| p.owner == owner)
                .ok_or(TreeError::ParentNotFound(pid))?;
            let order = as_order(sibling_count(store, owner, Some(pid)) + 1);
            (Some(pid), path::child_path(&parent.path, parent.id), order)
        }
        None => {
            let order = as_order(sibling_count(store, owner, None) + 1);
            (None, path::root_path(order), order)
        }
    };

    let record = store.insert(NewTodo {
        title: req.title,
        description: req.description,
        owner,
        completed: false,
        created_at: Utc::now(),
        deadline: req.deadline,
        parent_id,
        path: new_path,
        order_number,
    });
    debug!(id = %record.id, %owner, parent = ?parent_id, "created todo");

    Ok(collection(store, owner))
}

/// Apply field changes to a todo. A changed `parent_id` is delegated to
/// the move operation (path and order recomputation across the tree); a
/// provided `order_number` becomes a position move among siblings.
///
/// # Errors
///
/// [`TreeError::NotFound`] / [`TreeError::Unauthorized`] for a missing or
/// foreign record, [`TreeError::Validation`] for an empty title, plus any
/// error of [`move_todos`] when the parent changes.
pub fn update_todo(
    store: &mut TreeStore,
    owner: UserId,
    id: TodoId,
    update: UpdateTodo,
) -> Result<Vec<TodoRecord>, TreeError> {
    let record = require_owned(store, owner, id)?.clone();
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(TreeError::Validation {
                reason: "title must not be empty",
            });
        }
    }

    // Structural change first: re-parenting must recompute paths and
    // orders, so it goes through the move algorithm, not a field write.
    if let Some(new_parent) = update.parent_id {
        if new_parent != record.parent_id {
            move_todos(store, owner, &[id], new_parent)?;
        }
    }

    let patch = TodoPatch {
        title: update.title,
        description: update.description,
        completed: update.completed,
        deadline: update.deadline,
        ..TodoPatch::default()
    };
    if !patch.is_empty() {
        let _ = store.update(id, &patch);
    }

    if let Some(requested) = update.order_number {
        reposition(store, owner, id, requested);
    }

    debug!(%id, %owner, "updated todo");
    Ok(collection(store, owner))
}

/// Delete a todo and its entire descendant subtree, then close the order
/// gap it leaves among its former siblings.
///
/// # Errors
///
/// [`TreeError::NotFound`] / [`TreeError::Unauthorized`] for a missing or
/// foreign record.
pub fn delete_todo(
    store: &mut TreeStore,
    owner: UserId,
    id: TodoId,
) -> Result<Vec<TodoRecord>, TreeError> {
    let record = require_owned(store, owner, id)?;
    let parent_id = record.parent_id;
    let node_path = record.path.clone();

    let mut working = snapshot(store, owner);
    let victims: HashSet<TodoId> = working
        .values()
        .filter(|r| r.id == id || path::is_ancestor_path(&node_path, id, &r.path))
        .map(|r| r.id)
        .collect();
    for victim in &victims {
        working.remove(victim);
    }

    let survivors = children_sorted(&working, parent_id);
    apply_sibling_order(&mut working, parent_id, &survivors);

    commit(store, owner, &working, &victims);
    debug!(%id, %owner, removed = victims.len(), "deleted todo subtree");
    Ok(collection(store, owner))
}

/// Permute a sibling set: assign `order_number = index + 1` following
/// `ids`. Membership must not change — the list has to be an exact
/// permutation of the current siblings of `parent_id`.
///
/// Root reorders also rewrite each shifted root's path (which embeds the
/// order number) and cascade the rewrite through its descendants.
///
/// # Errors
///
/// [`TreeError::Validation`] on an empty list;
/// [`TreeError::NotFound`] / [`TreeError::Unauthorized`] per id;
/// [`TreeError::InvalidSiblingSet`] when the ids contain duplicates, name
/// a record under a different parent, or do not cover the whole set.
pub fn reorder_todos(
    store: &mut TreeStore,
    owner: UserId,
    ids: &[TodoId],
    parent_id: Option<TodoId>,
) -> Result<Vec<TodoRecord>, TreeError> {
    if ids.is_empty() {
        return Err(TreeError::Validation {
            reason: "todoIds must not be empty",
        });
    }

    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(TreeError::InvalidSiblingSet {
                reason: "duplicate todo id",
            });
        }
        let record = require_owned(store, owner, *id)?;
        if record.parent_id != parent_id {
            return Err(TreeError::InvalidSiblingSet {
                reason: "todo is not a child of the given parent",
            });
        }
    }
    if sibling_count(store, owner, parent_id) != ids.len() {
        return Err(TreeError::InvalidSiblingSet {
            reason: "ids must cover the entire sibling set",
        });
    }

    let mut working = snapshot(store, owner);
    apply_sibling_order(&mut working, parent_id, ids);
    commit(store, owner, &working, &HashSet::new());
    debug!(%owner, count = ids.len(), parent = ?parent_id, "reordered todos");
    Ok(collection(store, owner))
}

/// Move todos under a new parent (or to the root level), appending them
/// after the target's existing children in the order given.
///
/// Every descendant of a moved node has its stored path rewritten from
/// the node's old prefix to the new one; source sibling sets are
/// renumbered to close the gaps the move leaves behind.
///
/// # Errors
///
/// [`TreeError::Validation`] on an empty or duplicated id list;
/// [`TreeError::TargetParentNotFound`] / [`TreeError::Unauthorized`] for
/// the target; [`TreeError::NotFound`] / [`TreeError::Unauthorized`] per
/// moved id; [`TreeError::InvalidMove`] when the target is a moved node
/// itself or a descendant of one.
pub fn move_todos(
    store: &mut TreeStore,
    owner: UserId,
    ids: &[TodoId],
    target_parent_id: Option<TodoId>,
) -> Result<Vec<TodoRecord>, TreeError> {
    if ids.is_empty() {
        return Err(TreeError::Validation {
            reason: "todoIds must not be empty",
        });
    }
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(TreeError::Validation {
                reason: "duplicate todo id in move set",
            });
        }
    }

    let target = match target_parent_id {
        Some(tid) => {
            let t = store.get(tid).ok_or(TreeError::TargetParentNotFound(tid))?;
            if t.owner != owner {
                return Err(TreeError::Unauthorized { id: tid, owner });
            }
            Some(t.clone())
        }
        None => None,
    };

    for id in ids {
        let record = require_owned(store, owner, *id)?;
        if let Some(t) = &target {
            if *id == t.id || path::is_ancestor_path(&record.path, record.id, &t.path) {
                return Err(TreeError::InvalidMove {
                    id: *id,
                    target: t.id,
                });
            }
        }
    }

    let mut working = snapshot(store, owner);
    let moved: HashSet<TodoId> = ids.iter().copied().collect();

    // Sibling sets touched by the move: every source parent plus the
    // target. BTreeSet puts None (the root set) first, which matters:
    // root renumbering may rewrite root paths that child placement below
    // reads back.
    let mut affected: BTreeSet<Option<TodoId>> = BTreeSet::new();
    affected.insert(target_parent_id);
    for id in ids {
        if let Some(record) = working.get(id) {
            affected.insert(record.parent_id);
        }
    }

    for id in ids {
        if let Some(record) = working.get_mut(id) {
            record.parent_id = target_parent_id;
        }
    }

    for parent in affected {
        let mut ordered: Vec<TodoId> = children_sorted(&working, parent)
            .into_iter()
            .filter(|cid| !moved.contains(cid))
            .collect();
        if parent == target_parent_id {
            // Existing children keep their relative order; moved nodes
            // are appended in list order.
            ordered.extend(ids.iter().copied());
        }
        place_children(&mut working, parent, &ordered, &moved);
    }

    commit(store, owner, &working, &HashSet::new());
    debug!(%owner, count = ids.len(), target = ?target_parent_id, "moved todos");
    Ok(collection(store, owner))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

type Working = BTreeMap<TodoId, TodoRecord>;

fn require_owned<'a>(
    store: &'a TreeStore,
    owner: UserId,
    id: TodoId,
) -> Result<&'a TodoRecord, TreeError> {
    let record = store.get(id).ok_or(TreeError::NotFound(id))?;
    if record.owner == owner {
        Ok(record)
    } else {
        Err(TreeError::Unauthorized { id, owner })
    }
}

fn snapshot(store: &TreeStore, owner: UserId) -> Working {
    store
        .get_by_owner(owner)
        .into_iter()
        .map(|record| (record.id, record))
        .collect()
}

/// The owner's authoritative collection, id-ordered (creation order).
fn collection(store: &TreeStore, owner: UserId) -> Vec<TodoRecord> {
    let mut records = store.get_by_owner(owner);
    records.sort_by_key(|record| record.id);
    records
}

fn sibling_count(store: &TreeStore, owner: UserId, parent_id: Option<TodoId>) -> usize {
    store
        .get_by_owner(owner)
        .iter()
        .filter(|record| record.parent_id == parent_id)
        .count()
}

fn children_sorted(working: &Working, parent_id: Option<TodoId>) -> Vec<TodoId> {
    let mut children: Vec<(u32, TodoId)> = working
        .values()
        .filter(|record| record.parent_id == parent_id)
        .map(|record| (record.order_number, record.id))
        .collect();
    children.sort_unstable();
    children.into_iter().map(|(_, id)| id).collect()
}

/// Assign `order_number = index + 1` along `ordered`. A shifted root also
/// gets its path recomputed, with the rewrite cascaded to descendants.
fn apply_sibling_order(working: &mut Working, parent_id: Option<TodoId>, ordered: &[TodoId]) {
    for (idx, id) in ordered.iter().enumerate() {
        let order = as_order(idx + 1);
        let mut changed_path: Option<(String, String)> = None;
        {
            let Some(record) = working.get_mut(id) else {
                continue;
            };
            if record.order_number != order {
                record.order_number = order;
                if parent_id.is_none() {
                    let new_path = path::root_path(order);
                    let old_path = std::mem::replace(&mut record.path, new_path.clone());
                    changed_path = Some((old_path, new_path));
                }
            }
        }
        if let Some((old_path, new_path)) = changed_path {
            cascade_rewrite(working, *id, &old_path, &new_path);
        }
    }
}

/// Like [`apply_sibling_order`], but nodes in `repath` (the moved set)
/// always get their path recomputed from the new parent, cascading to
/// their descendants.
fn place_children(
    working: &mut Working,
    parent_id: Option<TodoId>,
    ordered: &[TodoId],
    repath: &HashSet<TodoId>,
) {
    let parent_prefix = parent_id
        .and_then(|pid| working.get(&pid))
        .map(|parent| path::child_path(&parent.path, parent.id));

    for (idx, id) in ordered.iter().enumerate() {
        let order = as_order(idx + 1);
        let mut changed_path: Option<(String, String)> = None;
        {
            let Some(record) = working.get_mut(id) else {
                continue;
            };
            record.order_number = order;

            let new_path = match (&parent_prefix, parent_id) {
                (Some(prefix), Some(_)) if repath.contains(id) => Some(prefix.clone()),
                (None, None) => {
                    let root = path::root_path(order);
                    (record.path != root).then_some(root)
                }
                _ => None,
            };
            if let Some(new_path) = new_path {
                if new_path != record.path {
                    let old_path = std::mem::replace(&mut record.path, new_path.clone());
                    changed_path = Some((old_path, new_path));
                }
            }
        }
        if let Some((old_path, new_path)) = changed_path {
            cascade_rewrite(working, *id, &old_path, &new_path);
        }
    }
}

/// Rewrite the paths of every descendant of `node_id` after its own path
/// changed from `old_path` to `new_path`. Flat scan over the snapshot;
/// the `(path, id)` prefix cannot capture the node's siblings even though
/// they share its path string.
fn cascade_rewrite(working: &mut Working, node_id: TodoId, old_path: &str, new_path: &str) {
    if old_path == new_path {
        return;
    }
    let old_prefix = path::child_path(old_path, node_id);
    let new_prefix = path::child_path(new_path, node_id);
    for record in working.values_mut() {
        if record.id == node_id {
            continue;
        }
        if path::is_ancestor_path(old_path, node_id, &record.path) {
            record.path = path::rewrite_prefix(&record.path, &old_prefix, &new_prefix);
        }
    }
}

/// Move one record to a requested 1-based position among its siblings,
/// clamped into range, renumbering the set.
fn reposition(store: &mut TreeStore, owner: UserId, id: TodoId, requested: u32) {
    let Some(record) = store.get(id) else { return };
    let parent_id = record.parent_id;

    let mut working = snapshot(store, owner);
    let mut ordered = children_sorted(&working, parent_id);
    let Some(current) = ordered.iter().position(|cid| *cid == id) else {
        return;
    };
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    let target = requested.clamp(1, ordered.len()) - 1;
    if current != target {
        let moved = ordered.remove(current);
        ordered.insert(target, moved);
    }
    apply_sibling_order(&mut working, parent_id, &ordered);
    commit(store, owner, &working, &HashSet::new());
}

/// Flush the working set back to the store: deletions first, then a
/// field-level diff per surviving record. Readers never observe the
/// intermediate states computed above.
fn commit(store: &mut TreeStore, owner: UserId, working: &Working, deleted: &HashSet<TodoId>) {
    for id in deleted {
        store.delete(*id);
    }
    for before in store.get_by_owner(owner) {
        if let Some(after) = working.get(&before.id) {
            if *after != before {
                let _ = store.update(before.id, &diff_patch(&before, after));
            }
        }
    }
}

fn diff_patch(before: &TodoRecord, after: &TodoRecord) -> TodoPatch {
    TodoPatch {
        title: (before.title != after.title).then(|| after.title.clone()),
        description: (before.description != after.description)
            .then(|| after.description.clone()),
        completed: (before.completed != after.completed).then_some(after.completed),
        deadline: (before.deadline != after.deadline).then_some(after.deadline),
        parent_id: (before.parent_id != after.parent_id).then_some(after.parent_id),
        path: (before.path != after.path).then(|| after.path.clone()),
        order_number: (before.order_number != after.order_number).then_some(after.order_number),
    }
}

fn as_order(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

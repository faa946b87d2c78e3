//! Authoritative storage for todo records.
//!
//! An arena of records keyed by integer id, with a secondary index from
//! owner to record ids in insertion order. The store owns the id counter
//! and does plain CRUD; ordering rules, path maintenance, and every other
//! business invariant live in [`crate::engine`], which is the sole writer
//! path above this layer.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{NewTodo, TodoId, TodoPatch, TodoRecord, UserId};

/// In-memory record store for all owners.
#[derive(Debug)]
pub struct TreeStore {
    records: HashMap<TodoId, TodoRecord>,
    by_owner: HashMap<UserId, Vec<TodoId>>,
    next_id: u64,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            by_owner: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a record, assigning it a fresh id.
    pub fn insert(&mut self, new: NewTodo) -> TodoRecord {
        let id = TodoId(self.next_id);
        self.next_id += 1;

        let record = TodoRecord {
            id,
            title: new.title,
            description: new.description,
            owner: new.owner,
            completed: new.completed,
            created_at: new.created_at,
            deadline: new.deadline,
            parent_id: new.parent_id,
            path: new.path,
            order_number: new.order_number,
        };

        self.by_owner.entry(record.owner).or_default().push(id);
        debug!(%id, owner = %record.owner, "inserted todo");
        self.records.insert(id, record.clone());
        record
    }

    /// Re-insert a record under its stored id, bumping the counter past it.
    ///
    /// Used by snapshot restore so that `parent_id` and `path` references
    /// keep resolving. Replaces any record already stored under that id.
    pub fn restore(&mut self, record: TodoRecord) {
        if self.next_id <= record.id.0 {
            self.next_id = record.id.0 + 1;
        }
        let ids = self.by_owner.entry(record.owner).or_default();
        if !ids.contains(&record.id) {
            ids.push(record.id);
        }
        self.records.insert(record.id, record);
    }

    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoRecord> {
        self.records.get(&id)
    }

    /// All records for one owner, in insertion order. The caller owns any
    /// further ordering.
    #[must_use]
    pub fn get_by_owner(&self, owner: UserId) -> Vec<TodoRecord> {
        self.by_owner
            .get(&owner)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.records.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Overwrite the provided fields; returns the updated record, or `None`
    /// if the id is unknown.
    pub fn update(&mut self, id: TodoId, patch: &TodoPatch) -> Option<TodoRecord> {
        let record = self.records.get_mut(&id)?;
        patch.apply_to(record);
        Some(record.clone())
    }

    /// Remove a single record. Returns true if it existed. Does not
    /// cascade; subtree deletion is layered above in the engine.
    pub fn delete(&mut self, id: TodoId) -> bool {
        let Some(record) = self.records.remove(&id) else {
            return false;
        };
        if let Some(ids) = self.by_owner.get_mut(&record.owner) {
            ids.retain(|other| *other != id);
        }
        debug!(%id, owner = %record.owner, "deleted todo");
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records across owners, unordered. Used by snapshot save.
    #[must_use]
    pub fn all(&self) -> Vec<TodoRecord> {
        let mut records: Vec<TodoRecord> = self.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::TreeStore;
    use crate::model::{NewTodo, TodoId, TodoPatch, TodoRecord, UserId};
    use chrono::Utc;

    fn new_todo(owner: u64, title: &str, parent_id: Option<TodoId>) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            description: String::new(),
            owner: UserId(owner),
            completed: false,
            created_at: Utc::now(),
            deadline: Utc::now(),
            parent_id,
            path: "1".to_string(),
            order_number: 1,
        }
    }

    #[test]
    fn insert_assigns_monotonic_ids() {
        let mut store = TreeStore::new();
        let a = store.insert(new_todo(1, "a", None));
        let b = store.insert(new_todo(1, "b", None));
        assert_eq!(a.id, TodoId(1));
        assert_eq!(b.id, TodoId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_by_owner_is_scoped_and_insertion_ordered() {
        let mut store = TreeStore::new();
        store.insert(new_todo(1, "mine", None));
        store.insert(new_todo(2, "theirs", None));
        store.insert(new_todo(1, "mine too", None));

        let mine = store.get_by_owner(UserId(1));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].title, "mine");
        assert_eq!(mine[1].title, "mine too");
        assert!(store.get_by_owner(UserId(3)).is_empty());
    }

    #[test]
    fn update_overwrites_only_patch_fields() {
        let mut store = TreeStore::new();
        let rec = store.insert(new_todo(1, "before", None));
        let patch = TodoPatch {
            title: Some("after".to_string()),
            ..TodoPatch::default()
        };
        let updated = store.update(rec.id, &patch).expect("record exists");
        assert_eq!(updated.title, "after");
        assert_eq!(updated.order_number, 1);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut store = TreeStore::new();
        assert!(store.update(TodoId(99), &TodoPatch::default()).is_none());
    }

    #[test]
    fn delete_removes_record_and_index_entry() {
        let mut store = TreeStore::new();
        let rec = store.insert(new_todo(1, "gone", None));
        assert!(store.delete(rec.id));
        assert!(!store.delete(rec.id));
        assert!(store.get(rec.id).is_none());
        assert!(store.get_by_owner(UserId(1)).is_empty());
    }

    #[test]
    fn restore_keeps_stored_id_and_bumps_counter() {
        let mut store = TreeStore::new();
        let record = TodoRecord {
            id: TodoId(40),
            title: "restored".to_string(),
            description: String::new(),
            owner: UserId(1),
            completed: false,
            created_at: Utc::now(),
            deadline: Utc::now(),
            parent_id: None,
            path: "1".to_string(),
            order_number: 1,
        };
        store.restore(record);

        assert!(store.get(TodoId(40)).is_some());
        let fresh = store.insert(new_todo(1, "fresh", None));
        assert_eq!(fresh.id, TodoId(41));
    }
}

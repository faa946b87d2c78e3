//! JSON snapshots of the full backend state.
//!
//! The original app survived reloads by stashing its mock DB in browser
//! storage; the embedded equivalent is a JSON file. Records keep their
//! stored ids on load, so `parentId` and path references stay valid
//! across restarts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use modo_core::TodoRecord;

use crate::auth::User;
use crate::service::MockBackend;

/// Everything the backend holds, in a serializable shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbState {
    pub users: Vec<User>,
    pub todos: Vec<TodoRecord>,
}

/// Write the backend state to `path` as pretty JSON.
///
/// # Errors
///
/// Fails on serialization or file-system errors.
pub fn save(backend: &MockBackend, path: &Path) -> Result<()> {
    let state = backend.export_state();
    let json = serde_json::to_string_pretty(&state).context("serialize backend state")?;
    fs::write(path, json).with_context(|| format!("write snapshot {}", path.display()))?;
    info!(
        users = state.users.len(),
        todos = state.todos.len(),
        path = %path.display(),
        "saved backend snapshot"
    );
    Ok(())
}

/// Load a snapshot into the backend, replacing its state.
///
/// Returns `false` when no snapshot exists at `path` (not an error: a
/// fresh environment simply starts empty or seeded).
///
/// # Errors
///
/// Fails on unreadable or unparseable snapshot files.
pub fn load(backend: &MockBackend, path: &Path) -> Result<bool> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot to load");
        return Ok(false);
    }
    let json =
        fs::read_to_string(path).with_context(|| format!("read snapshot {}", path.display()))?;
    let state: DbState = serde_json::from_str(&json)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    info!(
        users = state.users.len(),
        todos = state.todos.len(),
        path = %path.display(),
        "loaded backend snapshot"
    );
    backend.import_state(state);
    Ok(true)
}

/// Remove a snapshot file if present.
///
/// # Errors
///
/// Fails when the file exists but cannot be removed.
pub fn clear(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("remove snapshot {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{clear, load, save};
    use crate::schema::{CreateTodoRequest, LoginRequest};
    use crate::service::MockBackend;
    use chrono::Utc;

    #[test]
    fn snapshot_round_trip_preserves_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");

        let backend = MockBackend::seeded();
        let before = backend.todos(None);
        save(&backend, &path).expect("save");

        let restored = MockBackend::new();
        assert!(load(&restored, &path).expect("load"));
        let after = restored.todos(None);
        assert_eq!(before, after);

        // Accounts survive too: the demo login still works.
        restored
            .login(&LoginRequest {
                username: "demo".to_string(),
                password: "password123".to_string(),
            })
            .expect("login after restore");
    }

    #[test]
    fn restored_backend_keeps_numbering_consistent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");

        let backend = MockBackend::seeded();
        save(&backend, &path).expect("save");

        let restored = MockBackend::new();
        load(&restored, &path).expect("load");

        // New records must not collide with restored ids.
        let before_max = restored
            .todos(None)
            .iter()
            .map(|t| t.id.0)
            .max()
            .expect("non-empty");
        let todos = restored
            .create_todo(
                None,
                CreateTodoRequest {
                    title: "After restore".to_string(),
                    description: String::new(),
                    deadline: Utc::now(),
                    parent_id: None,
                },
            )
            .expect("create");
        let new_max = todos.iter().map(|t| t.id.0).max().expect("non-empty");
        assert!(new_max > before_max);
    }

    #[test]
    fn load_missing_snapshot_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let backend = MockBackend::new();
        assert!(!load(&backend, &path).expect("load"));
        assert!(backend.todos(None).is_empty());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        save(&MockBackend::seeded(), &path).expect("save");
        assert!(path.exists());
        clear(&path).expect("clear");
        assert!(!path.exists());
        // Clearing again is fine.
        clear(&path).expect("clear twice");
    }
}

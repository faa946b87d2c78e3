//! End-to-end walkthrough of the tree lifecycle against a real store:
//! goals, nested children, drag-reorder, re-parenting to root, and
//! cascading delete.

use chrono::Utc;
use modo_core::engine::{self, CreateTodo, UpdateTodo};
use modo_core::{TodoId, TodoRecord, TreeError, TreeStore, UserId};

const OWNER: UserId = UserId(1);

fn create(store: &mut TreeStore, title: &str, parent: Option<TodoId>) -> TodoRecord {
    let todos = engine::create_todo(
        store,
        OWNER,
        CreateTodo {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc::now(),
            parent_id: parent,
        },
    )
    .expect("create");
    todos
        .into_iter()
        .max_by_key(|t| t.id)
        .expect("non-empty collection")
}

fn get(store: &TreeStore, id: TodoId) -> TodoRecord {
    store.get(id).expect("record exists").clone()
}

#[test]
fn goal_lifecycle_walkthrough() {
    let mut store = TreeStore::new();

    // A first goal: order 1, path "1".
    let project = create(&mut store, "Project", None);
    assert!(project.parent_id.is_none());
    assert_eq!(project.order_number, 1);
    assert_eq!(project.path, "1");

    // First child inherits the goal's child prefix.
    let design = create(&mut store, "Design", Some(project.id));
    assert_eq!(design.parent_id, Some(project.id));
    assert_eq!(design.order_number, 1);
    assert_eq!(design.path, format!("1.{}", project.id));

    // Second child appends, sharing the prefix.
    let api = create(&mut store, "API", Some(project.id));
    assert_eq!(api.order_number, 2);
    assert_eq!(api.path, design.path);

    // Drag "API" above "Design".
    engine::reorder_todos(&mut store, OWNER, &[api.id, design.id], Some(project.id))
        .expect("reorder");
    assert_eq!(get(&store, api.id).order_number, 1);
    assert_eq!(get(&store, design.id).order_number, 2);

    // Give "Design" a child, then promote "Design" to a goal of its own:
    // it appends after the existing roots and its subtree follows.
    let wireframe = create(&mut store, "Wireframe", Some(design.id));
    assert_eq!(wireframe.path, format!("1.{}.{}", project.id, design.id));

    engine::move_todos(&mut store, OWNER, &[design.id], None).expect("move to root");
    let design_now = get(&store, design.id);
    assert!(design_now.parent_id.is_none());
    assert_eq!(design_now.order_number, 2);
    assert_eq!(design_now.path, "2");
    assert_eq!(get(&store, wireframe.id).path, format!("2.{}", design.id));

    // Deleting the first goal removes its remaining subtree and shifts
    // the promoted goal into slot 1, cascading into its descendants.
    engine::delete_todo(&mut store, OWNER, project.id).expect("delete");
    assert!(store.get(project.id).is_none());
    assert!(store.get(api.id).is_none());
    let design_after = get(&store, design.id);
    assert_eq!(design_after.order_number, 1);
    assert_eq!(design_after.path, "1");
    assert_eq!(get(&store, wireframe.id).path, format!("1.{}", design.id));

    // Only the promoted goal and its child survive.
    let remaining = store.get_by_owner(OWNER);
    assert_eq!(remaining.len(), 2);
}

#[test]
fn owners_are_isolated() {
    let mut store = TreeStore::new();
    let mine = create(&mut store, "mine", None);

    let theirs = engine::create_todo(
        &mut store,
        UserId(2),
        CreateTodo {
            title: "theirs".to_string(),
            description: String::new(),
            deadline: Utc::now(),
            parent_id: None,
        },
    )
    .expect("create");
    // Each owner numbers roots independently.
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].order_number, 1);
    assert_eq!(theirs[0].path, "1");

    // A foreign owner can neither read into mutations nor delete.
    let err = engine::delete_todo(&mut store, UserId(2), mine.id).unwrap_err();
    assert!(matches!(err, TreeError::Unauthorized { .. }));
    let err = engine::update_todo(
        &mut store,
        UserId(2),
        mine.id,
        UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, TreeError::Unauthorized { .. }));
    assert!(!get(&store, mine.id).completed);
}

#[test]
fn every_operation_returns_the_full_collection() {
    let mut store = TreeStore::new();
    let root = create(&mut store, "Root", None);
    let child = create(&mut store, "child", Some(root.id));

    let from_update = engine::update_todo(
        &mut store,
        OWNER,
        child.id,
        UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        },
    )
    .expect("update");
    assert_eq!(from_update.len(), 2);

    let from_reorder =
        engine::reorder_todos(&mut store, OWNER, &[child.id], Some(root.id)).expect("reorder");
    assert_eq!(from_reorder.len(), 2);

    let from_delete = engine::delete_todo(&mut store, OWNER, child.id).expect("delete");
    assert_eq!(from_delete.len(), 1);
    assert_eq!(from_delete[0].id, root.id);
}

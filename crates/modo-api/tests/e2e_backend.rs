//! End-to-end flows against the simulated backend: auth, the todo
//! surface, error-status mapping, and snapshot persistence.

use chrono::{Duration, Utc};
use modo_api::schema::{
    CreateTodoRequest, LoginRequest, MoveTodosRequest, ReorderTodosRequest, SignupRequest,
    UpdateTodoRequest,
};
use modo_api::{ErrorCode, MockBackend, persist};
use modo_core::model::TodoId;

fn signup_and_login(backend: &MockBackend, username: &str) -> String {
    backend
        .signup(&SignupRequest {
            username: username.to_string(),
            password: "password123".to_string(),
            nickname: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .expect("signup");
    backend
        .login(&LoginRequest {
            username: username.to_string(),
            password: "password123".to_string(),
        })
        .expect("login")
        .access_token
}

fn create(backend: &MockBackend, token: &str, title: &str, parent: Option<TodoId>) -> TodoId {
    let todos = backend
        .create_todo(
            Some(token),
            CreateTodoRequest {
                title: title.to_string(),
                description: String::new(),
                deadline: Utc::now() + Duration::days(7),
                parent_id: parent,
            },
        )
        .expect("create");
    todos.into_iter().map(|t| t.id).max().expect("non-empty")
}

#[test]
fn full_session_walkthrough() {
    let backend = MockBackend::new();
    let token = signup_and_login(&backend, "alice");

    let goal = create(&backend, &token, "Plan the trip", None);
    let flights = create(&backend, &token, "Book flights", Some(goal));
    let hotel = create(&backend, &token, "Book hotel", Some(goal));

    // Drag the hotel above the flights.
    let todos = backend
        .reorder_todos(
            Some(token.as_str()),
            &ReorderTodosRequest {
                todo_ids: vec![hotel, flights],
                parent_id: Some(goal),
            },
        )
        .expect("reorder");
    let hotel_dto = todos.iter().find(|t| t.id == hotel).expect("hotel");
    assert_eq!(hotel_dto.order_number, 1);

    // Complete the flights via a partial update.
    let todos = backend
        .update_todo(
            Some(token.as_str()),
            flights,
            UpdateTodoRequest {
                is_completed: Some(true),
                ..UpdateTodoRequest::default()
            },
        )
        .expect("update");
    assert!(todos.iter().find(|t| t.id == flights).expect("flights").is_completed);

    // Promote the hotel into its own goal.
    let todos = backend
        .move_todos(
            Some(token.as_str()),
            &MoveTodosRequest {
                todo_ids: vec![hotel],
                parent_id: None,
            },
        )
        .expect("move");
    let hotel_dto = todos.iter().find(|t| t.id == hotel).expect("hotel");
    assert!(hotel_dto.parent_id.is_none());
    assert_eq!(hotel_dto.path, "2");

    // Delete the original goal: its remaining subtree goes with it.
    backend.delete_todo(Some(token.as_str()), goal).expect("delete");
    let todos = backend.todos(Some(token.as_str()));
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, hotel);
    assert_eq!(todos[0].path, "1");
}

#[test]
fn error_statuses_match_the_original_handlers() {
    let backend = MockBackend::new();
    let alice = signup_and_login(&backend, "alice");
    let bob = signup_and_login(&backend, "bob");

    let goal = create(&backend, &alice, "Mine", None);

    // Missing todo: 404.
    let err = backend
        .delete_todo(Some(alice.as_str()), TodoId(999))
        .unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.code, ErrorCode::NotFound);

    // Foreign todo: 403.
    let err = backend.delete_todo(Some(bob.as_str()), goal).unwrap_err();
    assert_eq!(err.status(), 403);

    // Cycle-creating move: 400.
    let child = create(&backend, &alice, "child", Some(goal));
    let err = backend
        .move_todos(
            Some(alice.as_str()),
            &MoveTodosRequest {
                todo_ids: vec![goal],
                parent_id: Some(child),
            },
        )
        .unwrap_err();
    assert_eq!(err.status(), 400);

    // Empty id list: 400 before touching anything.
    let err = backend
        .reorder_todos(
            Some(alice.as_str()),
            &ReorderTodosRequest {
                todo_ids: vec![],
                parent_id: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.status(), 400);

    // Missing parent on create: 404.
    let err = backend
        .create_todo(
            Some(alice.as_str()),
            CreateTodoRequest {
                title: "orphan".to_string(),
                description: String::new(),
                deadline: Utc::now(),
                parent_id: Some(TodoId(999)),
            },
        )
        .unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn owners_never_see_each_other() {
    let backend = MockBackend::new();
    let alice = signup_and_login(&backend, "alice");
    let bob = signup_and_login(&backend, "bob");

    create(&backend, &alice, "Alice's goal", None);
    create(&backend, &bob, "Bob's goal", None);

    let alice_todos = backend.todos(Some(alice.as_str()));
    assert_eq!(alice_todos.len(), 1);
    assert_eq!(alice_todos[0].title, "Alice's goal");

    let bob_todos = backend.todos(Some(bob.as_str()));
    assert_eq!(bob_todos.len(), 1);
    // Both own a single root numbered 1: numbering is per owner.
    assert_eq!(bob_todos[0].order_number, 1);
}

#[test]
fn snapshot_survives_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");

    let backend = MockBackend::new();
    let token = signup_and_login(&backend, "alice");
    let goal = create(&backend, &token, "Persistent goal", None);
    let child = create(&backend, &token, "child", Some(goal));
    persist::save(&backend, &path).expect("save");

    // "Restart": a new backend picks up the snapshot.
    let restarted = MockBackend::new();
    assert!(persist::load(&restarted, &path).expect("load"));
    let token = restarted
        .login(&LoginRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        })
        .expect("login")
        .access_token;

    let todos = restarted.todos(Some(token.as_str()));
    assert_eq!(todos.len(), 2);
    let child_dto = todos.iter().find(|t| t.id == child).expect("child");
    assert_eq!(child_dto.parent_id, Some(goal));
    assert_eq!(child_dto.path, format!("1.{goal}"));

    // The tree stays mutable after restore.
    restarted.delete_todo(Some(token.as_str()), goal).expect("delete");
    assert!(restarted.todos(Some(token.as_str())).is_empty());
}

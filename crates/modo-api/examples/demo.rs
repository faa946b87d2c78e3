//! Drive the simulated backend end to end: seed, authenticate, build a
//! goal tree, drag things around, and clean up.
//!
//! ```sh
//! cargo run -p modo-api --example demo
//! ```

use chrono::{Duration, Utc};
use modo_api::schema::{CreateTodoRequest, LoginRequest, MoveTodosRequest, ReorderTodosRequest};
use modo_api::MockBackend;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,modo_core=debug,modo_api=debug".into()),
        )
        .init();

    let backend = MockBackend::seeded();
    let login = backend.login(&LoginRequest {
        username: "demo".to_string(),
        password: "password123".to_string(),
    })?;
    let token = Some(login.access_token.as_str());
    println!("logged in as {} ({})", login.username, login.role);

    let deadline = Utc::now() + Duration::days(3);
    let todos = backend.create_todo(
        token,
        CreateTodoRequest {
            title: "Plan the launch".to_string(),
            description: "New goal from the demo".to_string(),
            deadline,
            parent_id: None,
        },
    )?;
    let goal = todos.iter().max_by_key(|t| t.id).expect("just created");
    println!("created goal {} at path {}", goal.title, goal.path);

    let todos = backend.create_todo(
        token,
        CreateTodoRequest {
            title: "Draft announcement".to_string(),
            description: String::new(),
            deadline,
            parent_id: Some(goal.id),
        },
    )?;
    let draft = todos.iter().max_by_key(|t| t.id).expect("just created");

    // Reorder the goals: the new one first.
    let mut roots: Vec<_> = todos.iter().filter(|t| t.parent_id.is_none()).collect();
    roots.sort_by_key(|t| t.order_number);
    let mut order: Vec<_> = roots.iter().map(|t| t.id).collect();
    order.rotate_right(1);
    backend.reorder_todos(
        token,
        &ReorderTodosRequest {
            todo_ids: order,
            parent_id: None,
        },
    )?;

    // Promote the draft to a goal of its own.
    let todos = backend.move_todos(
        token,
        &MoveTodosRequest {
            todo_ids: vec![draft.id],
            parent_id: None,
        },
    )?;
    for todo in todos.iter().filter(|t| t.parent_id.is_none()) {
        println!("goal #{} {} (path {})", todo.order_number, todo.title, todo.path);
    }

    backend.delete_todo(token, goal.id)?;
    println!("deleted the launch goal; {} todos remain", backend.todos(token).len());

    Ok(())
}

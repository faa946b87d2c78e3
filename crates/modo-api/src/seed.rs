//! Deterministic sample data for demos and tests: two accounts and a
//! small goal tree for the demo user.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use modo_core::engine::{self, CreateTodo, UpdateTodo};
use modo_core::model::{TodoId, UserId};
use modo_core::TreeStore;

use crate::auth::{self, NewUser, Role, UserStore};

/// Build the seeded user and todo stores.
#[must_use]
pub fn sample_data() -> (UserStore, TreeStore) {
    let mut users = UserStore::new();
    let demo = users.insert(NewUser {
        username: "demo".to_string(),
        password_hash: auth::hash_password("password123"),
        nickname: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
        role: Role::User,
    });
    let admin = users.insert(NewUser {
        username: "admin".to_string(),
        password_hash: auth::hash_password("admin123"),
        nickname: "Administrator".to_string(),
        email: "admin@example.com".to_string(),
        role: Role::Admin,
    });

    let mut todos = TreeStore::new();
    let now = Utc::now();
    let tomorrow = now + Duration::days(1);
    let next_week = now + Duration::days(7);

    let project = create(
        &mut todos,
        demo.id,
        "Finish the project",
        "Ship the spring release",
        next_week,
        None,
    );
    let design = create(
        &mut todos,
        demo.id,
        "Design UI components",
        "Layouts and component states",
        tomorrow,
        Some(project),
    );
    create(
        &mut todos,
        demo.id,
        "Wire up the API",
        "Connect the backend endpoints",
        tomorrow,
        Some(project),
    );
    create(
        &mut todos,
        demo.id,
        "Write tests",
        "Unit and integration coverage",
        next_week,
        Some(project),
    );
    create(
        &mut todos,
        demo.id,
        "Daily study",
        "One hour every day",
        next_week,
        None,
    );
    create(
        &mut todos,
        admin.id,
        "Admin chores",
        "Keep the system healthy",
        next_week,
        None,
    );

    // The design work is already done in the sample.
    engine::update_todo(
        &mut todos,
        demo.id,
        design,
        UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        },
    )
    .expect("seed update is valid");

    debug!(todos = todos.len(), "sample data built");
    (users, todos)
}

fn create(
    todos: &mut TreeStore,
    owner: UserId,
    title: &str,
    description: &str,
    deadline: DateTime<Utc>,
    parent_id: Option<TodoId>,
) -> TodoId {
    let collection = engine::create_todo(
        todos,
        owner,
        CreateTodo {
            title: title.to_string(),
            description: description.to_string(),
            deadline,
            parent_id,
        },
    )
    .expect("seed create is valid");
    collection
        .into_iter()
        .map(|record| record.id)
        .max()
        .expect("collection is non-empty after create")
}

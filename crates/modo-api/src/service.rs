//! The simulated backend facade.
//!
//! [`MockBackend`] stands in for the real HTTP API: an embedding app
//! calls the same operations the server would expose, gets the same
//! response shapes, and never notices the storage is an in-process
//! store. One mutex guards the whole state; every mutation runs to
//! completion under it, so readers only ever observe fully-applied
//! trees (the engine's path cascades and renumbering are multi-record
//! writes).

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use modo_core::engine::{self, CreateTodo, UpdateTodo};
use modo_core::model::TodoId;
use modo_core::{TreeStore, UserId};

use crate::auth::{self, NewUser, Role, User, UserStore};
use crate::error::{ApiError, ErrorCode};
use crate::persist::DbState;
use crate::schema::{
    CreateTodoRequest, LoginRequest, LoginResponse, MoveTodosRequest, ReorderTodosRequest,
    SignupRequest, SignupResponse, TodoDto, UpdateTodoRequest,
};
use crate::seed;

struct State {
    users: UserStore,
    todos: TreeStore,
    token_nonce: u64,
}

/// In-process stand-in for the todo backend.
pub struct MockBackend {
    state: Mutex<State>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// An empty backend: no accounts, no todos.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                users: UserStore::new(),
                todos: TreeStore::new(),
                token_nonce: 0,
            }),
        }
    }

    /// A backend pre-populated with the demo accounts and sample tree.
    #[must_use]
    pub fn seeded() -> Self {
        let (users, todos) = seed::sample_data();
        info!("mock backend seeded with sample data");
        Self {
            state: Mutex::new(State {
                users,
                todos,
                token_nonce: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on missing fields, `UsernameTaken` on a duplicate
    /// username.
    pub fn signup(&self, req: &SignupRequest) -> Result<SignupResponse, ApiError> {
        if req.username.trim().is_empty() || req.password.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidRequest,
                "username and password are required",
            ));
        }
        let mut state = self.lock();
        if state.users.get_by_username(&req.username).is_some() {
            return Err(ApiError::new(
                ErrorCode::UsernameTaken,
                "username already exists",
            ));
        }
        let user = state.users.insert(NewUser {
            username: req.username.clone(),
            password_hash: auth::hash_password(&req.password),
            nickname: req.nickname.clone(),
            email: req.email.clone(),
            role: Role::User,
        });
        debug!(id = %user.id, username = %user.username, "registered user");
        Ok(SignupResponse {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            email: user.email,
            profile_img_path: user.profile_img_path,
            role: user.role.to_string(),
        })
    }

    /// Authenticate and mint a bearer token.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown username or wrong password —
    /// deliberately indistinguishable.
    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let mut state = self.lock();
        state.token_nonce += 1;
        let nonce = state.token_nonce;
        let user = state
            .users
            .get_by_username(&req.username)
            .filter(|user| auth::verify_password(&req.password, &user.password_hash))
            .ok_or_else(|| {
                ApiError::new(ErrorCode::InvalidCredentials, "invalid credentials")
            })?;
        debug!(id = %user.id, "user logged in");
        Ok(LoginResponse {
            access_token: auth::mint_token(user, nonce),
            username: user.username.clone(),
            role: user.role.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Todos
    // -----------------------------------------------------------------------

    /// The acting user's full todo collection.
    pub fn todos(&self, token: Option<&str>) -> Vec<TodoDto> {
        let owner = auth::user_id_or_default(token);
        let state = self.lock();
        collection(&state.todos, owner)
    }

    /// Create a todo; returns the updated collection.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on an empty title, `NotFound` when the parent
    /// does not resolve for this user.
    pub fn create_todo(
        &self,
        token: Option<&str>,
        req: CreateTodoRequest,
    ) -> Result<Vec<TodoDto>, ApiError> {
        if req.title.trim().is_empty() {
            return Err(ApiError::new(ErrorCode::InvalidRequest, "title is required"));
        }
        let owner = auth::user_id_or_default(token);
        let mut state = self.lock();
        let todos = engine::create_todo(
            &mut state.todos,
            owner,
            CreateTodo {
                title: req.title,
                description: req.description,
                deadline: req.deadline,
                parent_id: req.parent_id,
            },
        )?;
        Ok(into_dtos(todos))
    }

    /// Apply a partial update; a changed `parentId` re-parents the todo.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden`, or `InvalidRequest` mapped from the
    /// engine's taxonomy.
    pub fn update_todo(
        &self,
        token: Option<&str>,
        id: TodoId,
        req: UpdateTodoRequest,
    ) -> Result<Vec<TodoDto>, ApiError> {
        let owner = auth::user_id_or_default(token);
        let mut state = self.lock();
        let todos = engine::update_todo(
            &mut state.todos,
            owner,
            id,
            UpdateTodo {
                title: req.title,
                description: req.description,
                completed: req.is_completed,
                deadline: req.deadline,
                order_number: req.order_number,
                parent_id: req.parent_id,
            },
        )?;
        Ok(into_dtos(todos))
    }

    /// Permute siblings under one parent.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on an empty id list or a bad sibling set,
    /// `NotFound`/`Forbidden` per id.
    pub fn reorder_todos(
        &self,
        token: Option<&str>,
        req: &ReorderTodosRequest,
    ) -> Result<Vec<TodoDto>, ApiError> {
        if req.todo_ids.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidRequest,
                "todoIds array is required",
            ));
        }
        let owner = auth::user_id_or_default(token);
        let mut state = self.lock();
        let todos = engine::reorder_todos(&mut state.todos, owner, &req.todo_ids, req.parent_id)?;
        Ok(into_dtos(todos))
    }

    /// Move todos under a new parent (or to the root level).
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on an empty id list or a cycle-creating move,
    /// `NotFound`/`Forbidden` for unresolvable ids.
    pub fn move_todos(
        &self,
        token: Option<&str>,
        req: &MoveTodosRequest,
    ) -> Result<Vec<TodoDto>, ApiError> {
        if req.todo_ids.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidRequest,
                "todoIds array is required",
            ));
        }
        let owner = auth::user_id_or_default(token);
        let mut state = self.lock();
        let todos = engine::move_todos(&mut state.todos, owner, &req.todo_ids, req.parent_id)?;
        Ok(into_dtos(todos))
    }

    /// Delete a todo and its whole subtree.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` for a missing or foreign id.
    pub fn delete_todo(&self, token: Option<&str>, id: TodoId) -> Result<(), ApiError> {
        let owner = auth::user_id_or_default(token);
        let mut state = self.lock();
        engine::delete_todo(&mut state.todos, owner, id)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Copy the full backend state out for persistence.
    #[must_use]
    pub fn export_state(&self) -> DbState {
        let state = self.lock();
        DbState {
            users: state.users.all(),
            todos: state.todos.all(),
        }
    }

    /// Replace the backend state from a snapshot, keeping stored ids.
    pub fn import_state(&self, snapshot: DbState) {
        let mut users = UserStore::new();
        for user in snapshot.users {
            users.restore(user);
        }
        let mut todos = TreeStore::new();
        for todo in snapshot.todos {
            todos.restore(todo);
        }
        let mut state = self.lock();
        state.users = users;
        state.todos = todos;
    }

    /// Look up an account (test and demo support).
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.lock().users.get_by_username(username).cloned()
    }
}

fn collection(todos: &TreeStore, owner: UserId) -> Vec<TodoDto> {
    let mut records = todos.get_by_owner(owner);
    records.sort_by_key(|record| record.id);
    into_dtos(records)
}

fn into_dtos(records: Vec<modo_core::TodoRecord>) -> Vec<TodoDto> {
    records.into_iter().map(TodoDto::from).collect()
}

//! Typed wire schemas for the simulated backend.
//!
//! The payloads mirror the real backend's JSON: camelCase keys, RFC 3339
//! dates, and `parentId` always present on responses (`null` for roots).
//! Requests are validated by construction here instead of trusting loose
//! JSON bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use modo_core::model::{TodoId, TodoRecord, UserId};

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

/// A todo as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub creator_id: UserId,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    /// `null` marks a goal; the key is never omitted.
    pub parent_id: Option<TodoId>,
    pub path: String,
    pub order_number: u32,
}

impl From<TodoRecord> for TodoDto {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            creator_id: record.owner,
            is_completed: record.completed,
            created_at: record.created_at,
            deadline: record.deadline,
            parent_id: record.parent_id,
            path: record.path,
            order_number: record.order_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<TodoId>,
}

/// Partial update. `parent_id` distinguishes three cases: key absent
/// (leave the parent alone), `null` (promote to goal), id (re-parent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<u32>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<TodoId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTodosRequest {
    pub todo_ids: Vec<TodoId>,
    pub parent_id: Option<TodoId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTodosRequest {
    pub todo_ids: Vec<TodoId>,
    pub parent_id: Option<TodoId>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: UserId,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub profile_img_path: Option<String>,
    pub role: String,
}

/// Deserializer making an optional field's presence observable: a present
/// `null` becomes `Some(None)` instead of collapsing into `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

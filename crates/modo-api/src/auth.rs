//! Mock authentication: user records, credential hashing, and bearer
//! tokens good enough for a simulated backend — and nothing more.
//!
//! Tokens are transparent strings (`modo_token_{id}_{username}_{nonce}`)
//! so the interceptor can recover the acting user without a session
//! table. Requests without a parseable token fall back to a default dev
//! user, mirroring the original mock's behavior, with a warning.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use modo_core::model::UserId;

const TOKEN_PREFIX: &str = "modo_token_";

/// The user every unauthenticated dev request is attributed to.
pub const DEFAULT_DEV_USER: UserId = UserId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub nickname: String,
    pub email: String,
    pub profile_img_path: Option<String>,
    pub role: Role,
}

/// A user account before id assignment.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub nickname: String,
    pub email: String,
    pub role: Role,
}

/// In-memory user accounts with a username index.
#[derive(Debug)]
pub struct UserStore {
    users: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
    next_id: u64,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            by_username: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, new: NewUser) -> User {
        let id = UserId(self.next_id);
        self.next_id += 1;
        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
            nickname: new.nickname,
            email: new.email,
            profile_img_path: None,
            role: new.role,
        };
        self.by_username.insert(user.username.clone(), id);
        self.users.insert(id, user.clone());
        user
    }

    /// Re-insert a user under its stored id (snapshot restore).
    pub fn restore(&mut self, user: User) {
        if self.next_id <= user.id.0 {
            self.next_id = user.id.0 + 1;
        }
        self.by_username.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user);
    }

    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    #[must_use]
    pub fn get_by_username(&self, username: &str) -> Option<&User> {
        self.by_username
            .get(username)
            .and_then(|id| self.users.get(id))
    }

    /// All accounts, id-ordered. Used by snapshot save.
    #[must_use]
    pub fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }
}

/// SHA-256 hex of the password. Mock-grade: no salt, no stretching.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

/// Mint a transparent bearer token for a user.
#[must_use]
pub fn mint_token(user: &User, nonce: u64) -> String {
    format!("{TOKEN_PREFIX}{}_{}_{nonce}", user.id, user.username)
}

/// Recover the user id from a token minted by [`mint_token`].
#[must_use]
pub fn user_id_from_token(token: &str) -> Option<UserId> {
    let rest = token.strip_prefix(TOKEN_PREFIX)?;
    let id = rest.split('_').next()?.parse().ok()?;
    Some(UserId(id))
}

/// Resolve the acting user from an optional bearer token, falling back
/// to the default dev user the way the original interceptor did.
#[must_use]
pub fn user_id_or_default(token: Option<&str>) -> UserId {
    match token.and_then(user_id_from_token) {
        Some(id) => id,
        None => {
            warn!(fallback = %DEFAULT_DEV_USER, "no auth token, using default dev user");
            DEFAULT_DEV_USER
        }
    }
}

use std::fmt;

use modo_core::TreeError;

/// Machine-readable error codes for the simulated backend.
///
/// Each code carries the HTTP status the real backend would answer with,
/// so an embedding UI can translate failures uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidRequest,
    InvalidCredentials,
    Forbidden,
    NotFound,
    UsernameTaken,
    Internal,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidRequest => "E4001",
            Self::InvalidCredentials => "E4011",
            Self::Forbidden => "E4031",
            Self::NotFound => "E4041",
            Self::UsernameTaken => "E4091",
            Self::Internal => "E5001",
        }
    }

    /// HTTP status the real backend maps this code to.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::InvalidCredentials => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::UsernameTaken => 409,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A failed backend operation: code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.code.status()
    }
}

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        let code = match &err {
            TreeError::NotFound(_)
            | TreeError::ParentNotFound(_)
            | TreeError::TargetParentNotFound(_) => ErrorCode::NotFound,
            TreeError::Unauthorized { .. } => ErrorCode::Forbidden,
            TreeError::InvalidMove { .. }
            | TreeError::InvalidSiblingSet { .. }
            | TreeError::Validation { .. } => ErrorCode::InvalidRequest,
        };
        Self::new(code, err.to_string())
    }
}

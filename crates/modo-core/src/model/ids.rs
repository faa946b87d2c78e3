use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a todo record.
///
/// Assigned by [`TreeStore::insert`](crate::store::TreeStore::insert) from a
/// store-owned monotonic counter; stable for the record's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TodoId(pub u64);

/// Identifier of the user owning a set of todo records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoId, UserId};

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&TodoId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&UserId(1)).unwrap(), "1");
        assert_eq!(serde_json::from_str::<TodoId>("42").unwrap(), TodoId(42));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(TodoId(12).to_string(), "12");
        assert_eq!(UserId(3).to_string(), "3");
    }
}

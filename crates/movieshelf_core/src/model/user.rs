//! User identity and per-call session context.

use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Store-assigned user id. Monotonic, never reused.
pub type UserId = i64;

/// Registered catalog owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// Active user for a sequence of collection calls.
///
/// Callers thread this value through every operation instead of keeping a
/// process-wide "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }
}

/// Trims a user name and rejects blank input.
pub fn normalize_user_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUserName);
    }
    Ok(trimmed)
}

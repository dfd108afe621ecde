//! User aggregate root.
//!
//! A user owns a collection of dreams. Nothing derived from that collection
//! is stored on the user itself.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user.
pub type UserId = Uuid;

/// Journal owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl User {
    /// Creates a user with a generated id and zeroed timestamps.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Checks that `name` and `email` are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyField("email"));
        }
        Ok(())
    }
}

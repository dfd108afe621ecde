//! Domain model for users, dreams and their categories.
//!
//! # Responsibility
//! - Define canonical data structures consumed by the statistics engine.
//! - Own field-level validation rules shared by every store implementation.
//!
//! # Invariants
//! - Every user and dream is identified by a stable UUID.
//! - Dream dates are calendar dates without a time component.

pub mod dream;
pub mod user;

pub use dream::{CategoryKind, DreamId, DreamRecord};
pub use user::{User, UserId};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    EmptyField(&'static str),
    /// Lucidity ratings are non-negative.
    NegativeLucidity(i64),
    /// Tag or emotion name is empty after trimming.
    EmptyCategoryName(CategoryKind),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` cannot be empty"),
            Self::NegativeLucidity(value) => {
                write!(f, "lucidity must be >= 0, got {value}")
            }
            Self::EmptyCategoryName(kind) => write!(f, "{} name cannot be empty", kind.label()),
        }
    }
}

impl Error for ValidationError {}

//! Dream record model.
//!
//! # Responsibility
//! - Define the per-night journal record and its category links.
//! - Provide validation used by store read paths.
//!
//! # Invariants
//! - `dream_date` carries no time component.
//! - `lucidity` is never negative.
//! - A dream references one tag or emotion name at most once.

use super::{UserId, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a dream record.
pub type DreamId = Uuid;

/// Which many-to-many category a breakdown or frequency query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Tag,
    Emotion,
}

impl CategoryKind {
    /// Singular label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Emotion => "emotion",
        }
    }
}

/// One journaled dream owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamRecord {
    pub id: DreamId,
    pub user_id: UserId,
    pub dream_date: NaiveDate,
    pub lucidity: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Tag names, sorted by name.
    pub tags: Vec<String>,
    /// Emotion names, sorted by name.
    pub emotions: Vec<String>,
}

impl DreamRecord {
    /// Creates an untagged dream with a generated id.
    pub fn new(user_id: UserId, dream_date: NaiveDate, lucidity: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            dream_date,
            lucidity,
            title: None,
            description: None,
            tags: Vec::new(),
            emotions: Vec::new(),
        }
    }

    /// Builder-style helper to attach tag names.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper to attach emotion names.
    pub fn with_emotions<I, S>(mut self, emotions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emotions = emotions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns category names for the given kind.
    pub fn categories(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::Tag => &self.tags,
            CategoryKind::Emotion => &self.emotions,
        }
    }

    /// Validates lucidity and category names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lucidity < 0 {
            return Err(ValidationError::NegativeLucidity(self.lucidity));
        }
        for kind in [CategoryKind::Tag, CategoryKind::Emotion] {
            if self.categories(kind).iter().any(|name| name.trim().is_empty()) {
                return Err(ValidationError::EmptyCategoryName(kind));
            }
        }
        Ok(())
    }
}

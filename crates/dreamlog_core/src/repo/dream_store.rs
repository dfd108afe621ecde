//! Store contract consumed by the statistics engine.
//!
//! Every method is an independent point, range or aggregate query scoped to
//! one user. Implementations may answer from SQL or from memory; the engine
//! relies only on each query being consistent on its own.

use crate::db::DbError;
use crate::model::{CategoryKind, DreamRecord, User, UserId, ValidationError};
use crate::stats::{CategoryFrequency, DateRange, LuciditySum};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for query and seeding operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Referenced user does not exist.
    UserNotFound(UserId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted dream data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-only query contract over one user's dream records.
pub trait DreamRecordStore {
    /// All dream dates for the user, in any order, duplicates included.
    fn list_dream_dates(&self, user_id: UserId) -> RepoResult<Vec<NaiveDate>>;
    /// Number of dreams whose date falls inside `range` (inclusive).
    fn count_dreams_in_range(&self, user_id: UserId, range: &DateRange) -> RepoResult<u64>;
    fn total_dream_count(&self, user_id: UserId) -> RepoResult<u64>;
    fn sum_and_count_lucidity(&self, user_id: UserId) -> RepoResult<LuciditySum>;
    /// Join-row count per category name across all of the user's dreams.
    fn category_frequencies(
        &self,
        user_id: UserId,
        kind: CategoryKind,
    ) -> RepoResult<Vec<CategoryFrequency>>;
    /// Total join rows of `kind` across all of the user's dreams.
    fn total_category_occurrences(&self, user_id: UserId, kind: CategoryKind) -> RepoResult<u64>;
    fn exists_dream_on_date(&self, user_id: UserId, date: NaiveDate) -> RepoResult<bool>;
    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>>;
    /// Dreams ordered by `dream_date` ascending, with categories loaded.
    fn list_dreams(&self, user_id: UserId) -> RepoResult<Vec<DreamRecord>>;
}

impl<T: DreamRecordStore + ?Sized> DreamRecordStore for &T {
    fn list_dream_dates(&self, user_id: UserId) -> RepoResult<Vec<NaiveDate>> {
        (**self).list_dream_dates(user_id)
    }

    fn count_dreams_in_range(&self, user_id: UserId, range: &DateRange) -> RepoResult<u64> {
        (**self).count_dreams_in_range(user_id, range)
    }

    fn total_dream_count(&self, user_id: UserId) -> RepoResult<u64> {
        (**self).total_dream_count(user_id)
    }

    fn sum_and_count_lucidity(&self, user_id: UserId) -> RepoResult<LuciditySum> {
        (**self).sum_and_count_lucidity(user_id)
    }

    fn category_frequencies(
        &self,
        user_id: UserId,
        kind: CategoryKind,
    ) -> RepoResult<Vec<CategoryFrequency>> {
        (**self).category_frequencies(user_id, kind)
    }

    fn total_category_occurrences(&self, user_id: UserId, kind: CategoryKind) -> RepoResult<u64> {
        (**self).total_category_occurrences(user_id, kind)
    }

    fn exists_dream_on_date(&self, user_id: UserId, date: NaiveDate) -> RepoResult<bool> {
        (**self).exists_dream_on_date(user_id, date)
    }

    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        (**self).get_user(user_id)
    }

    fn list_dreams(&self, user_id: UserId) -> RepoResult<Vec<DreamRecord>> {
        (**self).list_dreams(user_id)
    }
}

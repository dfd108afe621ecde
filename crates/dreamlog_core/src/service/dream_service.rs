//! Dream listing use-cases backing the user read model.

use crate::model::{DreamRecord, User, UserId};
use crate::repo::dream_store::{DreamRecordStore, RepoError, RepoResult};

/// Read-only facade for user and dream lookups.
pub struct DreamService<S: DreamRecordStore> {
    store: S,
}

impl<S: DreamRecordStore> DreamService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        self.store.get_user(user_id)
    }

    /// Returns the user's dreams ordered by `dream_date` ascending.
    ///
    /// # Errors
    /// - `UserNotFound` when the user does not exist.
    pub fn sorted_dreams(&self, user_id: UserId) -> RepoResult<Vec<DreamRecord>> {
        if self.store.get_user(user_id)?.is_none() {
            return Err(RepoError::UserNotFound(user_id));
        }
        self.store.list_dreams(user_id)
    }
}

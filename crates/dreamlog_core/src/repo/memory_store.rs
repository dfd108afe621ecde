//! In-process dream store.
//!
//! Answers every store query by scanning owned records. Intended for tests
//! and for embedding callers that already hold dreams in memory.

use crate::model::{CategoryKind, DreamId, DreamRecord, User, UserId};
use crate::repo::dream_store::{DreamRecordStore, RepoError, RepoResult};
use crate::stats::{CategoryFrequency, DateRange, LuciditySum};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Dream store backed by in-memory collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDreamStore {
    users: BTreeMap<UserId, User>,
    dreams: Vec<DreamRecord>,
}

impl InMemoryDreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user after validation.
    pub fn insert_user(&mut self, user: User) -> RepoResult<UserId> {
        user.validate()?;
        let id = user.id;
        self.users.insert(id, user);
        Ok(id)
    }

    /// Adds a dream for an existing user.
    ///
    /// Category names are trimmed and deduplicated per dream, mirroring the
    /// one-join-row-per-pair rule of the SQL schema.
    pub fn insert_dream(&mut self, mut dream: DreamRecord) -> RepoResult<DreamId> {
        dream.validate()?;
        if !self.users.contains_key(&dream.user_id) {
            return Err(RepoError::UserNotFound(dream.user_id));
        }
        dream.tags = unique_names(&dream.tags);
        dream.emotions = unique_names(&dream.emotions);
        let id = dream.id;
        self.dreams.push(dream);
        Ok(id)
    }

    fn dreams_of(&self, user_id: UserId) -> impl Iterator<Item = &DreamRecord> {
        self.dreams
            .iter()
            .filter(move |dream| dream.user_id == user_id)
    }
}

impl DreamRecordStore for InMemoryDreamStore {
    fn list_dream_dates(&self, user_id: UserId) -> RepoResult<Vec<NaiveDate>> {
        Ok(self.dreams_of(user_id).map(|dream| dream.dream_date).collect())
    }

    fn count_dreams_in_range(&self, user_id: UserId, range: &DateRange) -> RepoResult<u64> {
        Ok(self
            .dreams_of(user_id)
            .filter(|dream| range.contains(dream.dream_date))
            .count() as u64)
    }

    fn total_dream_count(&self, user_id: UserId) -> RepoResult<u64> {
        Ok(self.dreams_of(user_id).count() as u64)
    }

    fn sum_and_count_lucidity(&self, user_id: UserId) -> RepoResult<LuciditySum> {
        Ok(self
            .dreams_of(user_id)
            .fold(LuciditySum::default(), |acc, dream| LuciditySum {
                sum: acc.sum + dream.lucidity,
                count: acc.count + 1,
            }))
    }

    fn category_frequencies(
        &self,
        user_id: UserId,
        kind: CategoryKind,
    ) -> RepoResult<Vec<CategoryFrequency>> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for name in self
            .dreams_of(user_id)
            .flat_map(|dream| dream.categories(kind))
        {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, frequency)| CategoryFrequency::new(name, frequency))
            .collect())
    }

    fn total_category_occurrences(&self, user_id: UserId, kind: CategoryKind) -> RepoResult<u64> {
        Ok(self
            .dreams_of(user_id)
            .map(|dream| dream.categories(kind).len() as u64)
            .sum())
    }

    fn exists_dream_on_date(&self, user_id: UserId, date: NaiveDate) -> RepoResult<bool> {
        Ok(self
            .dreams_of(user_id)
            .any(|dream| dream.dream_date == date))
    }

    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.get(&user_id).cloned())
    }

    fn list_dreams(&self, user_id: UserId) -> RepoResult<Vec<DreamRecord>> {
        let mut dreams: Vec<DreamRecord> = self.dreams_of(user_id).cloned().collect();
        // stable sort keeps insertion order within one day
        dreams.sort_by_key(|dream| dream.dream_date);
        Ok(dreams)
    }
}

fn unique_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

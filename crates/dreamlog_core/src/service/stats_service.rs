//! Dream statistics engine.
//!
//! # Responsibility
//! - Compute per-user streaks, period counts, lucidity average and category
//!   breakdowns from store queries.
//! - Resolve empty collections to defined values; surface store failures.
//!
//! # Invariants
//! - Every call recomputes from the store. Nothing is cached.
//! - Store errors are returned unmodified inside `StoreUnavailable`, never
//!   retried.
//! - Only metadata (stat name, user id, timing) is logged.

use crate::clock::{Clock, SystemClock};
use crate::config::StatsConfig;
use crate::model::{CategoryKind, UserId};
use crate::repo::dream_store::{DreamRecordStore, RepoError};
use crate::stats::{
    current_run, longest_run, month_containing, top_breakdown, week_containing, BreakdownEntry,
    DateRange, RangeError,
};
use chrono::NaiveDate;
use log::{debug, error};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StatsResult<T> = Result<T, StatsError>;

/// Engine error surfaced to callers.
#[derive(Debug)]
pub enum StatsError {
    /// A store query failed.
    StoreUnavailable(RepoError),
    /// Date boundaries were out of order or unrepresentable.
    InvalidRange(RangeError),
    /// Snapshot requested for a user the store does not know.
    UserNotFound(UserId),
}

impl Display for StatsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "dream store unavailable: {err}"),
            Self::InvalidRange(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
        }
    }
}

impl Error for StatsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::InvalidRange(err) => Some(err),
            Self::UserNotFound(_) => None,
        }
    }
}

impl From<RepoError> for StatsError {
    fn from(value: RepoError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<RangeError> for StatsError {
    fn from(value: RangeError) -> Self {
        Self::InvalidRange(value)
    }
}

/// Every statistic for one user, computed against a single "today".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_id: UserId,
    pub as_of: NaiveDate,
    pub current_streak: u64,
    pub longest_streak: u64,
    pub dreams_this_week: u64,
    pub dreams_this_month: u64,
    pub total_dreams: u64,
    pub average_lucidity: Option<f64>,
    pub top_tags: Vec<BreakdownEntry>,
    pub top_emotions: Vec<BreakdownEntry>,
}

/// Statistics facade over a dream store and a clock.
pub struct DreamStatsService<S: DreamRecordStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: StatsConfig,
}

impl<S: DreamRecordStore> DreamStatsService<S, SystemClock> {
    /// Creates a service reading "today" from the system clock with default
    /// configuration.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, StatsConfig::default())
    }
}

impl<S: DreamRecordStore, C: Clock> DreamStatsService<S, C> {
    pub fn with_clock(store: S, clock: C, config: StatsConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Consecutive days with a dream, counted backward from today.
    pub fn current_streak(&self, user_id: UserId) -> StatsResult<u64> {
        self.current_streak_at(user_id, self.clock.today())
    }

    /// Longest run of consecutive days with at least one dream.
    pub fn longest_streak(&self, user_id: UserId) -> StatsResult<u64> {
        self.observe("longest_streak", user_id, || {
            let dates = self.store.list_dream_dates(user_id)?;
            Ok(longest_run(&dates))
        })
    }

    /// Dreams dated inside the current week (inclusive).
    pub fn dreams_this_week(&self, user_id: UserId) -> StatsResult<u64> {
        self.dreams_this_week_at(user_id, self.clock.today())
    }

    /// Dreams dated inside the current calendar month (inclusive).
    pub fn dreams_this_month(&self, user_id: UserId) -> StatsResult<u64> {
        self.dreams_this_month_at(user_id, self.clock.today())
    }

    pub fn total_dreams(&self, user_id: UserId) -> StatsResult<u64> {
        self.observe("total_dreams", user_id, || {
            Ok(self.store.total_dream_count(user_id)?)
        })
    }

    /// Mean lucidity rounded to two decimals, `None` without dreams.
    pub fn average_lucidity(&self, user_id: UserId) -> StatsResult<Option<f64>> {
        self.observe("average_lucidity", user_id, || {
            Ok(self.store.sum_and_count_lucidity(user_id)?.average())
        })
    }

    pub fn top_tags(&self, user_id: UserId) -> StatsResult<Vec<BreakdownEntry>> {
        self.top_categories(user_id, CategoryKind::Tag)
    }

    pub fn top_emotions(&self, user_id: UserId) -> StatsResult<Vec<BreakdownEntry>> {
        self.top_categories(user_id, CategoryKind::Emotion)
    }

    /// Ranked breakdown of one category kind plus the trailing bucket.
    pub fn top_categories(
        &self,
        user_id: UserId,
        kind: CategoryKind,
    ) -> StatsResult<Vec<BreakdownEntry>> {
        let stat = match kind {
            CategoryKind::Tag => "top_tags",
            CategoryKind::Emotion => "top_emotions",
        };
        self.observe(stat, user_id, || {
            let frequencies = self.store.category_frequencies(user_id, kind)?;
            let total = self.store.total_category_occurrences(user_id, kind)?;
            Ok(top_breakdown(
                frequencies,
                total,
                self.config.top_n,
                &self.config.other_label,
            ))
        })
    }

    /// Dreams dated between caller-supplied bounds (inclusive).
    ///
    /// # Errors
    /// - `InvalidRange` when `start` is after `end`.
    pub fn count_dreams_between(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StatsResult<u64> {
        self.observe("dreams_between", user_id, || {
            let range = DateRange::new(start, end)?;
            Ok(self.store.count_dreams_in_range(user_id, &range)?)
        })
    }

    /// Computes every statistic for one user against one "today".
    ///
    /// # Errors
    /// - `UserNotFound` when the store has no such user.
    pub fn user_stats(&self, user_id: UserId) -> StatsResult<UserStats> {
        if self.store.get_user(user_id)?.is_none() {
            return Err(StatsError::UserNotFound(user_id));
        }

        let today = self.clock.today();
        Ok(UserStats {
            user_id,
            as_of: today,
            current_streak: self.current_streak_at(user_id, today)?,
            longest_streak: self.longest_streak(user_id)?,
            dreams_this_week: self.dreams_this_week_at(user_id, today)?,
            dreams_this_month: self.dreams_this_month_at(user_id, today)?,
            total_dreams: self.total_dreams(user_id)?,
            average_lucidity: self.average_lucidity(user_id)?,
            top_tags: self.top_tags(user_id)?,
            top_emotions: self.top_emotions(user_id)?,
        })
    }

    fn current_streak_at(&self, user_id: UserId, today: NaiveDate) -> StatsResult<u64> {
        self.observe("current_streak", user_id, || {
            Ok(current_run(today, |day| {
                self.store.exists_dream_on_date(user_id, day)
            })?)
        })
    }

    fn dreams_this_week_at(&self, user_id: UserId, today: NaiveDate) -> StatsResult<u64> {
        self.observe("dreams_this_week", user_id, || {
            let week = week_containing(today, self.config.week_start)?;
            Ok(self.store.count_dreams_in_range(user_id, &week)?)
        })
    }

    fn dreams_this_month_at(&self, user_id: UserId, today: NaiveDate) -> StatsResult<u64> {
        self.observe("dreams_this_month", user_id, || {
            let month = month_containing(today)?;
            Ok(self.store.count_dreams_in_range(user_id, &month)?)
        })
    }

    fn observe<T, F>(&self, stat: &'static str, user_id: UserId, compute: F) -> StatsResult<T>
    where
        F: FnOnce() -> StatsResult<T>,
    {
        let started_at = Instant::now();
        let result = compute();
        match &result {
            Ok(_) => debug!(
                "event=stat_compute module=stats status=ok stat={stat} user_id={user_id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=stat_compute module=stats status=error stat={stat} user_id={user_id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

//! Core domain logic for DreamLog.
//! Read-only dream statistics over a pluggable dream record store.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StatsConfig};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::{CategoryKind, DreamId, DreamRecord, User, UserId, ValidationError};
pub use repo::dream_store::{DreamRecordStore, RepoError, RepoResult};
pub use repo::memory_store::InMemoryDreamStore;
pub use repo::sqlite_store::SqliteDreamStore;
pub use service::dream_service::DreamService;
pub use service::stats_service::{DreamStatsService, StatsError, StatsResult, UserStats};
pub use stats::{BreakdownEntry, CategoryFrequency, DateRange, LuciditySum, RangeError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

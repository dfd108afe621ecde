//! Pure aggregate computations behind the dream statistics engine.
//!
//! # Responsibility
//! - Reduce store query results into statistic values.
//! - Resolve empty collections to defined values locally.
//!
//! # Invariants
//! - Nothing here performs I/O or reads the system clock.
//! - No function divides by a count without branching on zero first.

pub mod breakdown;
pub mod lucidity;
pub mod period;
pub mod streak;

pub use breakdown::{round2, top_breakdown, BreakdownEntry, CategoryFrequency};
pub use lucidity::LuciditySum;
pub use period::{month_containing, week_containing, DateRange, RangeError};
pub use streak::{current_run, longest_run};

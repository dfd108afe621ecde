//! Dream record store contracts and implementations.
//!
//! # Responsibility
//! - Define the read-only query contract the statistics engine consumes.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Store reads never mutate dream data.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod dream_store;
pub mod memory_store;
pub mod sqlite_store;

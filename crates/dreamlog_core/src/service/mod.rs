//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store queries into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod dream_service;
pub mod stats_service;

//! Statistics engine configuration.
//!
//! # Invariants
//! - `top_n >= 1`.
//! - `other_label` is non-empty after trimming.

use chrono::Weekday;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_TOP_N: usize = 5;
const DEFAULT_OTHER_LABEL: &str = "other";

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid stats config: {err}"),
            Self::Invalid(message) => write!(f, "invalid stats config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Tunables for breakdown size, week boundaries and bucket naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    /// Named entries kept in each breakdown before the trailing bucket.
    pub top_n: usize,
    /// First day of the week used by `dreams_this_week`.
    pub week_start: Weekday,
    /// Name of the synthesized trailing bucket.
    pub other_label: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            week_start: Weekday::Sun,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }
}

impl StatsConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("`top_n` must be at least 1".to_string()));
        }
        if self.other_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "`other_label` cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

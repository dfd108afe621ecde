//! Top-N categorical breakdown with a synthesized trailing bucket.
//!
//! # Invariants
//! - Ranking is frequency descending, then name ascending.
//! - Output holds at most `top_n` named entries plus exactly one trailing
//!   bucket labelled by the caller (normally `other`).
//! - A zero remainder yields a trailing bucket of exactly `0` / `0.0`.

use serde::{Deserialize, Serialize};

/// Occurrence count for one tag or emotion name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    pub name: String,
    pub frequency: u64,
}

impl CategoryFrequency {
    pub fn new(name: impl Into<String>, frequency: u64) -> Self {
        Self {
            name: name.into(),
            frequency,
        }
    }
}

/// One row of a breakdown report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub frequency: u64,
    pub percent: f64,
}

impl BreakdownEntry {
    fn empty_remainder(label: &str) -> Self {
        Self {
            name: label.to_string(),
            frequency: 0,
            percent: 0.0,
        }
    }
}

/// Rounds half away from zero to two decimals, folding `-0.0` into `0.0`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Builds the ranked breakdown for one category kind.
///
/// `total_occurrences` is the number of dream/category join rows. When it is
/// zero the result is a single empty trailing bucket and no division happens.
pub fn top_breakdown(
    mut frequencies: Vec<CategoryFrequency>,
    total_occurrences: u64,
    top_n: usize,
    other_label: &str,
) -> Vec<BreakdownEntry> {
    if total_occurrences == 0 {
        return vec![BreakdownEntry::empty_remainder(other_label)];
    }

    frequencies.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.name.cmp(&b.name))
    });
    frequencies.truncate(top_n);

    let total = total_occurrences as f64;
    let mut entries: Vec<BreakdownEntry> = frequencies
        .into_iter()
        .map(|item| BreakdownEntry {
            percent: round2(item.frequency as f64 / total * 100.0),
            name: item.name,
            frequency: item.frequency,
        })
        .collect();

    let captured: u64 = entries.iter().map(|entry| entry.frequency).sum();
    let remainder = total_occurrences.saturating_sub(captured);
    let trailing = if remainder == 0 {
        BreakdownEntry::empty_remainder(other_label)
    } else {
        let captured_percent: f64 = entries.iter().map(|entry| entry.percent).sum();
        BreakdownEntry {
            name: other_label.to_string(),
            frequency: remainder,
            // per-entry rounding can push the captured share a hair over 100
            percent: round2(100.0 - captured_percent).max(0.0),
        }
    };
    entries.push(trailing);
    entries
}

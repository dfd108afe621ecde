//! Streak computations over dream dates.
//!
//! A streak is a maximal run of consecutive calendar days that each have at
//! least one dream. Several dreams on one day count as one occupied day.

use chrono::NaiveDate;

/// Returns the length of the longest run of consecutive occupied days.
///
/// Input order does not matter and duplicates are collapsed. Empty input
/// yields `0`.
pub fn longest_run(dates: &[NaiveDate]) -> u64 {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut best = 0_u64;
    let mut current = 0_u64;
    let mut previous: Option<NaiveDate> = None;
    for date in sorted {
        current = match previous.and_then(|prev| prev.succ_opt()) {
            Some(next) if next == date => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(date);
    }
    best
}

/// Counts occupied days walking backward from `today`, stopping at the first
/// gap. No dream on `today` yields `0`.
///
/// `has_dream` is asked once per day; its first error aborts the walk.
pub fn current_run<F, E>(today: NaiveDate, mut has_dream: F) -> Result<u64, E>
where
    F: FnMut(NaiveDate) -> Result<bool, E>,
{
    let mut length = 0_u64;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !has_dream(day)? {
            break;
        }
        length += 1;
        cursor = day.pred_opt();
    }
    Ok(length)
}

//! Calendar period boundaries.
//!
//! # Invariants
//! - `DateRange` is inclusive on both ends and `start <= end`.
//! - Weeks are always seven days; months follow the calendar.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invalid or unrepresentable date boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// `start` falls after `end`.
    Unordered { start: NaiveDate, end: NaiveDate },
    /// A boundary around `anchor` falls outside the supported calendar.
    OutOfCalendar { anchor: NaiveDate },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unordered { start, end } => {
                write!(f, "range start {start} is after range end {end}")
            }
            Self::OutOfCalendar { anchor } => {
                write!(f, "period boundary around {anchor} is out of calendar range")
            }
        }
    }
}

impl Error for RangeError {}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Wire form of `DateRange`, validated through `DateRange::new`.
#[derive(Deserialize)]
struct RangeBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = RangeError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl DateRange {
    /// Builds a range, rejecting out-of-order boundaries.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Unordered { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Returns the seven-day week containing `today`, starting on `week_start`.
pub fn week_containing(today: NaiveDate, week_start: Weekday) -> Result<DateRange, RangeError> {
    let offset = (i64::from(today.weekday().num_days_from_monday())
        - i64::from(week_start.num_days_from_monday()))
    .rem_euclid(7);
    let out_of_calendar = RangeError::OutOfCalendar { anchor: today };

    // rem_euclid(7) keeps the offset in 0..7
    let start = today
        .checked_sub_days(Days::new(offset.unsigned_abs()))
        .ok_or(out_of_calendar)?;
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or(out_of_calendar)?;
    DateRange::new(start, end)
}

/// Returns the first through last day of the month containing `today`.
pub fn month_containing(today: NaiveDate) -> Result<DateRange, RangeError> {
    let out_of_calendar = RangeError::OutOfCalendar { anchor: today };
    let start = today.with_day(1).ok_or(out_of_calendar)?;
    let next_month_start = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let end = next_month_start
        .and_then(|date| date.pred_opt())
        .ok_or(out_of_calendar)?;
    DateRange::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::{month_containing, week_containing, DateRange, RangeError};
    use chrono::{NaiveDate, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sunday_week_contains_today() {
        // 2024-03-13 is a Wednesday.
        let week = week_containing(d(2024, 3, 13), Weekday::Sun).unwrap();
        assert_eq!(week.start(), d(2024, 3, 10));
        assert_eq!(week.end(), d(2024, 3, 16));
    }

    #[test]
    fn week_starting_today_begins_on_today() {
        let week = week_containing(d(2024, 3, 10), Weekday::Sun).unwrap();
        assert_eq!(week.start(), d(2024, 3, 10));

        let saturday = week_containing(d(2024, 3, 16), Weekday::Sun).unwrap();
        assert_eq!(saturday.start(), d(2024, 3, 10));
    }

    #[test]
    fn monday_week_start_is_supported() {
        let week = week_containing(d(2024, 3, 10), Weekday::Mon).unwrap();
        assert_eq!(week.start(), d(2024, 3, 4));
        assert_eq!(week.end(), d(2024, 3, 10));
    }

    #[test]
    fn month_handles_leap_february_and_december() {
        let feb = month_containing(d(2024, 2, 14)).unwrap();
        assert_eq!(feb.start(), d(2024, 2, 1));
        assert_eq!(feb.end(), d(2024, 2, 29));

        let dec = month_containing(d(2023, 12, 31)).unwrap();
        assert_eq!(dec.start(), d(2023, 12, 1));
        assert_eq!(dec.end(), d(2023, 12, 31));
    }

    #[test]
    fn range_rejects_unordered_bounds() {
        let err = DateRange::new(d(2024, 1, 2), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, RangeError::Unordered { .. }));
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1))
            .unwrap()
            .contains(d(2024, 1, 1)));
    }

    #[test]
    fn deserialized_range_keeps_ordering_check() {
        let err = serde_json::from_str::<DateRange>(
            r#"{"start":"2024-05-02","end":"2024-05-01"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("after range end"));

        let range: DateRange =
            serde_json::from_str(r#"{"start":"2024-05-01","end":"2024-05-02"}"#).unwrap();
        assert_eq!(range.start(), d(2024, 5, 1));
        assert_eq!(range.end(), d(2024, 5, 2));
    }

    #[test]
    fn month_at_calendar_edge_is_rejected() {
        let err = month_containing(NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, RangeError::OutOfCalendar { .. }));
    }
}

//! Weekly commitment resolution onto calendar dates.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::api::{RecurringCommitment, TimeRange};

/// Whether the date falls on a weekend.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Reduce a faculty member's weekly schedule to the intervals blocked on
/// `date`: the commitments whose weekday matches, as minute ranges.
///
/// An empty commitment set means no structural constraints; it is not an
/// error for a faculty member to have no recurring schedule on file.
pub fn blocked_intervals(date: NaiveDate, commitments: &[RecurringCommitment]) -> Vec<TimeRange> {
    let weekday = date.weekday();
    commitments
        .iter()
        .filter(|c| c.day_of_week == weekday)
        .map(|c| c.time)
        .collect()
}

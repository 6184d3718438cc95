//! Half-open interval overlap tests.
//!
//! Intervals are `[start, end)`. Adjacent intervals, where one ends exactly when the
//! other starts, are NOT conflicts.

use chrono::{Duration, NaiveDateTime};

use crate::calendar::BusyInterval;

/// Two intervals overlap iff `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// End of a meeting, clamped to the last representable instant.
pub fn meeting_end(start: NaiveDateTime, duration: Duration) -> NaiveDateTime {
    start
        .checked_add_signed(duration)
        .unwrap_or(NaiveDateTime::MAX)
}

/// Every busy interval that a meeting starting at `start` and lasting `duration`
/// would collide with, in input order.
pub fn find_conflicts<'a>(
    start: NaiveDateTime,
    duration: Duration,
    busy: &'a [BusyInterval],
) -> Vec<&'a BusyInterval> {
    let end = meeting_end(start, duration);
    busy.iter()
        .filter(|b| overlaps(start, end, b.start, b.end))
        .collect()
}

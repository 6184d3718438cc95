//! Remove candidates that collide with anyone's busy time.
//!
//! Busy intervals of all requested people are merged into sorted, non-overlapping
//! periods first. Because merged periods are ordered by both start and end, each
//! candidate is checked with a single binary search.

use chrono::{Duration, NaiveDateTime};

use crate::calendar::BusyInterval;
use crate::conflict::{meeting_end, overlaps};

/// A merged busy period (union of one or more busy intervals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Merge overlapping or adjacent busy intervals.
///
/// Returns a sorted, non-overlapping list of periods. Input order does not matter.
pub fn merge_busy_periods(busy: &[BusyInterval]) -> Vec<BusyPeriod> {
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> =
        busy.iter().map(|b| (b.start, b.end)).collect();
    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_unstable();

    let mut merged: Vec<BusyPeriod> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.end {
                last.end = last.end.max(end);
                continue;
            }
        }
        merged.push(BusyPeriod { start, end });
    }

    merged
}

/// Keep the candidates whose occupancy `[c, c + duration)` meets no busy interval.
///
/// A slot is free only when every requested person is free, so `busy` is the union
/// of everyone's intervals. Meetings that touch a busy interval at a shared boundary
/// are kept. Candidate order is preserved.
pub fn filter_available(
    candidates: &[NaiveDateTime],
    duration: Duration,
    busy: &[BusyInterval],
) -> Vec<NaiveDateTime> {
    let periods = merge_busy_periods(busy);
    if periods.is_empty() {
        return candidates.to_vec();
    }

    candidates
        .iter()
        .copied()
        .filter(|&start| is_free(&periods, start, meeting_end(start, duration)))
        .collect()
}

fn is_free(periods: &[BusyPeriod], start: NaiveDateTime, end: NaiveDateTime) -> bool {
    // First period that has not finished by `start`; only it can reach into the slot.
    let idx = periods.partition_point(|p| p.end <= start);
    match periods.get(idx) {
        Some(p) => !overlaps(start, end, p.start, p.end),
        None => true,
    }
}

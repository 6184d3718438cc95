//! Candidate start-time generation.
//!
//! Walks the query window in fixed steps and keeps every start at which a meeting of
//! the requested length begins and ends within office hours of the same day. No
//! calendar is consulted here.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{FreeTimeError, Result};

/// Daily office hours at hour granularity: `[start_hour:00, end_hour:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeHours {
    start_hour: u32,
    end_hour: u32,
    closing: NaiveTime,
}

impl OfficeHours {
    /// # Errors
    /// Returns `FreeTimeError::InvalidOfficeHours` unless `start_hour < end_hour <= 23`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        let closing = NaiveTime::from_hms_opt(end_hour, 0, 0).ok_or_else(|| {
            FreeTimeError::InvalidOfficeHours(format!("hour {} out of range 0-23", end_hour))
        })?;
        if start_hour >= end_hour {
            return Err(FreeTimeError::InvalidOfficeHours(format!(
                "start hour {} must be before end hour {}",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
            closing,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Closing instant on `date`. Minutes are always zero.
    pub fn closing_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.closing)
    }

    /// True if a meeting starting at `start` and lasting `duration` opens during
    /// office hours and finishes no later than closing time of the same day.
    pub fn admits(&self, start: NaiveDateTime, duration: Duration) -> bool {
        let hour = start.hour();
        if hour < self.start_hour || hour >= self.end_hour {
            return false;
        }
        match start.checked_add_signed(duration) {
            Some(end) => end <= self.closing_on(start.date()),
            None => false,
        }
    }
}

impl fmt::Display for OfficeHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_hour, self.end_hour)
    }
}

/// Enumerate candidate meeting starts in `[earliest_start, latest_start]`.
///
/// The pointer starts at `earliest_start` and advances by `granularity` until it
/// passes `latest_start`; both ends of the window are inclusive. Each pointer is kept
/// if [`OfficeHours::admits`] it. Output is strictly ascending.
///
/// Returns nothing when `latest_start < earliest_start` or `granularity` is not
/// positive.
pub fn generate_candidates(
    earliest_start: NaiveDateTime,
    latest_start: NaiveDateTime,
    duration: Duration,
    office_hours: OfficeHours,
    granularity: Duration,
) -> Vec<NaiveDateTime> {
    let mut candidates = Vec::new();
    if granularity <= Duration::zero() {
        return candidates;
    }

    let mut pointer = earliest_start;
    while pointer <= latest_start {
        if office_hours.admits(pointer, duration) {
            candidates.push(pointer);
        }
        pointer = match pointer.checked_add_signed(granularity) {
            Some(next) => next,
            None => break,
        };
    }

    candidates
}

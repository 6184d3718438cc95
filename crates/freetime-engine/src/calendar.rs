//! In-memory calendar store and the busy-interval fetch interface.
//!
//! All busy intervals live in a single arena owned by [`Calendar`]. A per-person
//! index maps each [`PersonId`] to positions in that arena, so a busy query for a set
//! of people reads intervals without ever touching person records.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};

/// Opaque external identifier of a person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A half-open `[start, end)` commitment of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub person_id: PersonId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyInterval {
    /// Build an interval, enforcing `start < end`.
    ///
    /// # Errors
    /// Returns `FreeTimeError::InvalidInterval` when `start >= end`.
    pub fn new(person_id: PersonId, start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(FreeTimeError::InvalidInterval(format!(
                "{} - {} for {}: start must be before end",
                start, end, person_id
            )));
        }
        Ok(Self {
            person_id,
            start,
            end,
        })
    }

    /// True if this interval intersects `[window_start, window_end)`.
    pub fn intersects(&self, window_start: NaiveDateTime, window_end: NaiveDateTime) -> bool {
        crate::conflict::overlaps(self.start, self.end, window_start, window_end)
    }
}

impl fmt::Display for BusyInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.person_id, self.start, self.end)
    }
}

/// Read access to stored busy intervals.
///
/// Implementations return every interval `I` belonging to one of `people` with
/// `I.start < window_end && I.end > window_start`, sorted by `(start, end)`.
/// The call must read a single consistent snapshot and have no side effects.
/// Identifiers the source does not know contribute nothing.
pub trait BusySource {
    fn busy_intervals(
        &self,
        people: &BTreeSet<PersonId>,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Result<Vec<BusyInterval>>;
}

/// People and their busy intervals, held in memory.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    people: HashMap<PersonId, String>,
    intervals: Vec<BusyInterval>,
    by_person: HashMap<PersonId, Vec<usize>>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a person. Returns `false` (and keeps the existing name) when the id
    /// is already known.
    pub fn add_person(&mut self, id: PersonId, name: impl Into<String>) -> bool {
        if self.people.contains_key(&id) {
            return false;
        }
        self.people.insert(id, name.into());
        true
    }

    /// Record a busy interval for a known person.
    ///
    /// Returns `Ok(false)` when an identical interval is already stored.
    ///
    /// # Errors
    /// Returns `FreeTimeError::UnknownPerson` if `id` was never added, and
    /// `FreeTimeError::InvalidInterval` if `start >= end`.
    pub fn add_busy(
        &mut self,
        id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<bool> {
        if !self.people.contains_key(id) {
            return Err(FreeTimeError::UnknownPerson(id.to_string()));
        }
        let interval = BusyInterval::new(id.clone(), start, end)?;

        let slots = self.by_person.entry(id.clone()).or_default();
        if slots.iter().any(|&i| self.intervals[i] == interval) {
            return Ok(false);
        }
        slots.push(self.intervals.len());
        self.intervals.push(interval);
        Ok(true)
    }

    pub fn contains_person(&self, id: &PersonId) -> bool {
        self.people.contains_key(id)
    }

    pub fn person_name(&self, id: &PersonId) -> Option<&str> {
        self.people.get(id).map(String::as_str)
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn busy_count(&self) -> usize {
        self.intervals.len()
    }
}

impl BusySource for Calendar {
    fn busy_intervals(
        &self,
        people: &BTreeSet<PersonId>,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Result<Vec<BusyInterval>> {
        let mut busy: Vec<BusyInterval> = people
            .iter()
            .filter_map(|id| self.by_person.get(id))
            .flatten()
            .map(|&i| &self.intervals[i])
            .filter(|interval| interval.intersects(window_start, window_end))
            .cloned()
            .collect();

        busy.sort_by_key(|interval| (interval.start, interval.end));
        Ok(busy)
    }
}

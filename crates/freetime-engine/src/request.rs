//! Parse boundary: raw textual request fields → validated [`Query`].
//!
//! A request either validates completely or is rejected with a single error; no part
//! of a malformed request reaches the resolver.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::PersonId;
use crate::config::{TimeFormat, DEFAULT_GRANULARITY_MINUTES};
use crate::error::{FreeTimeError, Result};
use crate::slots::OfficeHours;

/// A free-time request as it arrives from outside, every field still text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTimeRequest {
    pub employee_ids: Option<String>,
    pub duration: Option<String>,
    pub earliest_start: Option<String>,
    pub latest_start: Option<String>,
    pub office_hours: Option<String>,
}

impl FreeTimeRequest {
    /// Validate every field and build a [`Query`].
    ///
    /// # Errors
    /// Returns the first failing field's error: `MissingField`, `InvalidDuration`,
    /// `InvalidTimestamp` or `InvalidOfficeHours`.
    pub fn validate(&self, format: &TimeFormat, granularity_minutes: u32) -> Result<Query> {
        let duration = parse_duration(required(&self.duration, "duration")?)?;
        let earliest_start =
            parse_timestamp(required(&self.earliest_start, "earliest_start")?, format)?;
        let latest_start = parse_timestamp(required(&self.latest_start, "latest_start")?, format)?;
        let office_hours = parse_office_hours(required(&self.office_hours, "office_hours")?)?;
        let person_ids = parse_person_ids(required(&self.employee_ids, "employee_ids")?);

        Ok(Query {
            person_ids,
            duration_minutes: duration,
            earliest_start,
            latest_start,
            office_hours,
            granularity_minutes,
        })
    }
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    field.as_deref().ok_or(FreeTimeError::MissingField(name))
}

/// A validated free-time query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub person_ids: BTreeSet<PersonId>,
    pub duration_minutes: u32,
    pub earliest_start: NaiveDateTime,
    pub latest_start: NaiveDateTime,
    pub office_hours: OfficeHours,
    pub granularity_minutes: u32,
}

impl Query {
    /// A query with the default 30-minute granularity.
    pub fn new(
        person_ids: impl IntoIterator<Item = PersonId>,
        duration_minutes: u32,
        earliest_start: NaiveDateTime,
        latest_start: NaiveDateTime,
        office_hours: OfficeHours,
    ) -> Self {
        Self {
            person_ids: person_ids.into_iter().collect(),
            duration_minutes,
            earliest_start,
            latest_start,
            office_hours,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }

    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn granularity(&self) -> Duration {
        Duration::minutes(i64::from(self.granularity_minutes))
    }
}

/// Meeting length in whole minutes; must be positive.
pub fn parse_duration(text: &str) -> Result<u32> {
    let minutes: u32 = text
        .trim()
        .parse()
        .map_err(|_| FreeTimeError::InvalidDuration(text.to_string()))?;
    if minutes == 0 {
        return Err(FreeTimeError::InvalidDuration(text.to_string()));
    }
    Ok(minutes)
}

/// Naive local timestamp in the configured parse format.
pub fn parse_timestamp(text: &str, format: &TimeFormat) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), &format.parse).map_err(|_| {
        FreeTimeError::InvalidTimestamp {
            value: text.to_string(),
            format: format.parse.clone(),
        }
    })
}

/// Render a timestamp in the configured output format.
///
/// # Errors
/// Returns `FreeTimeError::InvalidConfig` when the render pattern needs data a naive
/// timestamp lacks (an offset or zone name) or is not a valid pattern.
pub fn render_timestamp(ts: NaiveDateTime, format: &TimeFormat) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", ts.format(&format.render)).map_err(|_| {
        FreeTimeError::InvalidConfig(format!("cannot render with '{}'", format.render))
    })?;
    Ok(out)
}

/// Office hours written as `"H-H"` (e.g. `"8-17"` or `"08-17"`).
pub fn parse_office_hours(text: &str) -> Result<OfficeHours> {
    let invalid = || FreeTimeError::InvalidOfficeHours(text.to_string());

    let (start, end) = text.trim().split_once('-').ok_or_else(invalid)?;
    let start = parse_hour(start).ok_or_else(invalid)?;
    let end = parse_hour(end).ok_or_else(invalid)?;
    OfficeHours::new(start, end)
}

fn parse_hour(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|&h| h <= 23)
}

/// Comma-separated person ids. Empty segments are dropped and duplicates collapse,
/// so `""` is the empty set.
pub fn parse_person_ids(text: &str) -> BTreeSet<PersonId> {
    text.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PersonId::from)
        .collect()
}

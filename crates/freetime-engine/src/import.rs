//! Load people and meetings from a `;`-separated flat calendar file.
//!
//! Two record shapes share one file:
//!
//! ```text
//! 170378154979885419149243073079764064027;Colin Gomez
//! 170378154979885419149243073079764064027;3/13/2015 8:00:00 AM;3/13/2015 9:00:00 AM;C5CAC7AC...
//! ```
//!
//! Two fields describe a person, four fields a meeting (the fourth is ignored). All
//! people are registered before any meeting, whatever the line order. Bad lines are
//! reported and skipped; only I/O failures abort the import.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::{Calendar, PersonId};
use crate::config::TimeFormat;
use crate::error::{FreeTimeError, Result};
use crate::request::parse_timestamp;

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    /// Field count matches neither record shape.
    Malformed,
    /// Person record with an empty name.
    EmptyName,
    /// Person id already registered; the first name is kept.
    DuplicatePerson,
    /// Meeting timestamp does not match the parse format.
    UnparsableTimestamp,
    /// Meeting start is not before its end.
    StartNotBeforeEnd,
    /// Meeting refers to a person that was never registered.
    UnknownPerson,
    /// Identical meeting already loaded for this person.
    DuplicateMeeting,
    /// The calendar store refused the meeting for another reason.
    Rejected,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::Malformed => "malformed line",
            IssueKind::EmptyName => "empty name",
            IssueKind::DuplicatePerson => "person already loaded",
            IssueKind::UnparsableTimestamp => "unparsable timestamp",
            IssueKind::StartNotBeforeEnd => "start >= end",
            IssueKind::UnknownPerson => "person does not exist",
            IssueKind::DuplicateMeeting => "meeting already loaded",
            IssueKind::Rejected => "rejected by calendar",
        };
        f.write_str(label)
    }
}

/// A skipped line, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub line: usize,
    pub kind: IssueKind,
    pub content: String,
}

/// Summary of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub lines_read: usize,
    pub people_loaded: usize,
    pub meetings_loaded: usize,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    fn flag(&mut self, line: usize, kind: IssueKind, content: &str) {
        warn!(line, issue = %kind, content, "skipping calendar line");
        self.issues.push(ImportIssue {
            line,
            kind,
            content: content.to_string(),
        });
    }
}

/// Import a calendar file from disk.
pub fn load_calendar_file(
    path: impl AsRef<Path>,
    format: &TimeFormat,
) -> Result<(Calendar, ImportReport)> {
    let file = File::open(path.as_ref())?;
    load_calendar(BufReader::new(file), format)
}

/// Import a calendar from any line-oriented reader.
///
/// # Errors
/// Returns `FreeTimeError::Io` if reading fails. Content problems never fail the
/// import; they are listed in the returned [`ImportReport`].
pub fn load_calendar<R: BufRead>(reader: R, format: &TimeFormat) -> Result<(Calendar, ImportReport)> {
    let mut report = ImportReport::default();
    let mut people: Vec<(usize, String)> = Vec::new();
    let mut meetings: Vec<(usize, String)> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let number = idx + 1;
        report.lines_read = number;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.split(';').count() {
            2 => people.push((number, trimmed.to_string())),
            4 => meetings.push((number, trimmed.to_string())),
            _ => report.flag(number, IssueKind::Malformed, trimmed),
        }
    }

    let mut calendar = Calendar::new();

    for (number, line) in &people {
        let (id, name) = match line.split_once(';') {
            Some(fields) => fields,
            None => continue,
        };
        if name.trim().is_empty() {
            report.flag(*number, IssueKind::EmptyName, line);
        } else if calendar.add_person(PersonId::from(id), name.trim()) {
            report.people_loaded += 1;
        } else {
            report.flag(*number, IssueKind::DuplicatePerson, line);
        }
    }

    for (number, line) in &meetings {
        match add_meeting(&mut calendar, line, format) {
            Ok(()) => report.meetings_loaded += 1,
            Err(kind) => report.flag(*number, kind, line),
        }
    }

    info!(
        lines = report.lines_read,
        people = report.people_loaded,
        meetings = report.meetings_loaded,
        issues = report.issues.len(),
        "calendar import finished"
    );
    Ok((calendar, report))
}

fn add_meeting(
    calendar: &mut Calendar,
    line: &str,
    format: &TimeFormat,
) -> std::result::Result<(), IssueKind> {
    let mut fields = line.split(';');
    let (id, start, end) = match (fields.next(), fields.next(), fields.next()) {
        (Some(id), Some(start), Some(end)) => (PersonId::from(id), start, end),
        _ => return Err(IssueKind::Malformed),
    };

    let start = timestamp(start, format)?;
    let end = timestamp(end, format)?;

    match calendar.add_busy(&id, start, end) {
        Ok(true) => Ok(()),
        Ok(false) => Err(IssueKind::DuplicateMeeting),
        Err(FreeTimeError::UnknownPerson(_)) => Err(IssueKind::UnknownPerson),
        Err(FreeTimeError::InvalidInterval(_)) => Err(IssueKind::StartNotBeforeEnd),
        Err(_) => Err(IssueKind::Rejected),
    }
}

fn timestamp(text: &str, format: &TimeFormat) -> std::result::Result<NaiveDateTime, IssueKind> {
    parse_timestamp(text, format).map_err(|_| IssueKind::UnparsableTimestamp)
}

//! Resolver settings: timestamp formats and candidate granularity.
//!
//! Settings are plain values handed to the parse and render functions. They can be
//! loaded from a TOML document; every field is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! granularity_minutes = 30
//!
//! [time_format]
//! parse = "%m/%d/%Y %I:%M:%S %p"
//! render = "%m/%d/%Y %I:%M:%S %p"
//! ```

use std::fmt::Write as _;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};

/// Default `strftime` pattern for incoming and outgoing timestamps.
pub const DEFAULT_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Default step between candidate start times, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Timestamp patterns used at the parse and render boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeFormat {
    /// Pattern for timestamps in requests and calendar files.
    pub parse: String,
    /// Pattern for timestamps in results.
    pub render: String,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            parse: DEFAULT_TIME_FORMAT.to_string(),
            render: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time_format: TimeFormat,
    pub granularity_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::default(),
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a TOML document.
    ///
    /// # Errors
    /// Returns `FreeTimeError::InvalidConfig` if the document is not valid TOML, a
    /// format pattern is empty or unusable, or the granularity is zero.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| FreeTimeError::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        check_pattern("time_format.parse", &self.time_format.parse)?;
        check_pattern("time_format.render", &self.time_format.render)?;
        check_renders_naive(&self.time_format.render)?;
        if self.granularity_minutes == 0 {
            return Err(FreeTimeError::InvalidConfig(
                "granularity_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_pattern(field: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(FreeTimeError::InvalidConfig(format!(
            "{} must not be empty",
            field
        )));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FreeTimeError::InvalidConfig(format!(
            "{} has an invalid pattern '{}'",
            field, pattern
        )));
    }
    Ok(())
}

/// Naive timestamps carry no offset or zone, so `%z` and friends fail at render time.
fn check_renders_naive(pattern: &str) -> Result<()> {
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN);
    let mut out = String::new();
    write!(out, "{}", sample.format(pattern)).map_err(|_| {
        FreeTimeError::InvalidConfig(format!(
            "time_format.render '{}' cannot render a timestamp without a time zone",
            pattern
        ))
    })
}

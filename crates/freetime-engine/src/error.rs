//! Error types for freetime-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreeTimeError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid timestamp '{value}' (expected format '{format}')")]
    InvalidTimestamp { value: String, format: String },

    #[error("Invalid office hours: {0}")]
    InvalidOfficeHours(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FreeTimeError {
    /// True for errors raised while validating a request, before any resolution runs.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FreeTimeError::MissingField(_)
                | FreeTimeError::InvalidDuration(_)
                | FreeTimeError::InvalidTimestamp { .. }
                | FreeTimeError::InvalidOfficeHours(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FreeTimeError>;

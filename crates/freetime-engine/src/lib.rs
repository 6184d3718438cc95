//! # freetime-engine
//!
//! Deterministic free-time slot resolution for groups of people.
//!
//! Given the people to invite, a window of acceptable start times, a meeting length
//! and daily office hours, the engine lists every start time (on a fixed 30-minute
//! grid) at which nobody invited is busy and the whole meeting stays inside office
//! hours of its day.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use freetime_engine::{find_free_times, Calendar, OfficeHours, PersonId, Query};
//!
//! let day = NaiveDate::from_ymd_opt(2023, 2, 12).unwrap();
//! let at = |h, m| day.and_hms_opt(h, m, 0).unwrap();
//!
//! let mut calendar = Calendar::new();
//! let ada = PersonId::from("ada");
//! calendar.add_person(ada.clone(), "Ada");
//! calendar.add_busy(&ada, at(8, 0), at(12, 0)).unwrap();
//! calendar.add_busy(&ada, at(13, 0), at(17, 0)).unwrap();
//!
//! let query = Query::new([ada], 60, at(8, 0), at(16, 0), OfficeHours::new(8, 17).unwrap());
//! let free = find_free_times(&query, &calendar).unwrap();
//! assert_eq!(free.freetimes, vec![at(12, 0)]);
//! ```
//!
//! ## Modules
//!
//! - [`slots`] - office hours and candidate start-time generation
//! - [`availability`] - busy-period merging and candidate filtering
//! - [`conflict`] - half-open interval overlap tests
//! - [`calendar`] - in-memory calendar store and the [`BusySource`] interface
//! - [`request`] - textual request validation, timestamp parse/render
//! - [`resolver`] - end-to-end resolution
//! - [`import`] - flat calendar file loader
//! - [`config`] - settings (time formats, granularity)
//! - [`error`] - Error types

pub mod availability;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod import;
pub mod request;
pub mod resolver;
pub mod slots;

pub use availability::filter_available;
pub use calendar::{BusyInterval, BusySource, Calendar, PersonId};
pub use config::{Settings, TimeFormat};
pub use conflict::find_conflicts;
pub use error::FreeTimeError;
pub use import::{load_calendar, load_calendar_file, ImportReport};
pub use request::{FreeTimeRequest, Query};
pub use resolver::{find_free_times, FreeTimes, RenderedFreeTimes};
pub use slots::{generate_candidates, OfficeHours};

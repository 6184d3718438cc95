//! `freetime` CLI - find common free meeting times in a flat calendar file.
//!
//! ## Usage
//!
//! ```sh
//! # Free 60-minute slots for two people on one day, office hours 8-17
//! freetime query --data freebusy.txt --employee-ids 100,200 --duration 60 \
//!   --earliest-start "2/12/2023 8:00:00 AM" --latest-start "2/12/2023 4:00:00 PM" \
//!   --office-hours 8-17
//!
//! # Which meetings block a specific slot?
//! freetime check --data freebusy.txt --employee-ids 100,200 \
//!   --start "2/12/2023 9:00:00 AM" --duration 60
//!
//! # Import summary for a calendar file
//! freetime load --data freebusy.txt --issues
//!
//! # Custom timestamp formats / granularity
//! freetime --config freetime.toml query ...
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use freetime_engine::request::{parse_duration, parse_person_ids, parse_timestamp};
use freetime_engine::{
    find_conflicts, find_free_times, load_calendar_file, BusySource, Calendar, FreeTimeRequest,
    ImportReport, Settings,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Find common free meeting times"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML settings file (time formats, granularity)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every start time at which all listed people are free
    Query {
        /// Calendar file with people and meetings
        #[arg(short, long)]
        data: PathBuf,
        /// Comma-separated person ids (empty means nobody is busy)
        #[arg(long, default_value = "")]
        employee_ids: String,
        /// Meeting length in minutes
        #[arg(long)]
        duration: String,
        /// Earliest acceptable start time
        #[arg(long)]
        earliest_start: String,
        /// Latest acceptable start time (inclusive)
        #[arg(long)]
        latest_start: String,
        /// Office hours as "H-H", e.g. "8-17"
        #[arg(long)]
        office_hours: String,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
    /// Show which meetings collide with one specific slot
    Check {
        /// Calendar file with people and meetings
        #[arg(short, long)]
        data: PathBuf,
        /// Comma-separated person ids
        #[arg(long)]
        employee_ids: String,
        /// Proposed start time
        #[arg(long)]
        start: String,
        /// Meeting length in minutes
        #[arg(long)]
        duration: String,
    },
    /// Import a calendar file and print a summary
    Load {
        /// Calendar file with people and meetings
        #[arg(short, long)]
        data: PathBuf,
        /// Also list every skipped line
        #[arg(long)]
        issues: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.config.as_deref() {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Query {
            data,
            employee_ids,
            duration,
            earliest_start,
            latest_start,
            office_hours,
            pretty,
        } => {
            let request = FreeTimeRequest {
                employee_ids: Some(employee_ids),
                duration: Some(duration),
                earliest_start: Some(earliest_start),
                latest_start: Some(latest_start),
                office_hours: Some(office_hours),
            };
            let query = request
                .validate(&settings.time_format, settings.granularity_minutes)
                .context("Invalid request")?;

            let (calendar, _) = load(&data, &settings)?;
            let free = find_free_times(&query, &calendar).context("Failed to resolve free times")?;

            let rendered = free
                .render(&settings.time_format)
                .context("Failed to render free times")?;
            let json = if pretty {
                serde_json::to_string_pretty(&rendered)?
            } else {
                serde_json::to_string(&rendered)?
            };
            println!("{}", json);
        }
        Commands::Check {
            data,
            employee_ids,
            start,
            duration,
        } => {
            let start = parse_timestamp(&start, &settings.time_format).context("Invalid request")?;
            let minutes = parse_duration(&duration).context("Invalid request")?;
            let length = Duration::minutes(i64::from(minutes));
            let people = parse_person_ids(&employee_ids);

            let (calendar, _) = load(&data, &settings)?;
            let end = start
                .checked_add_signed(length)
                .context("Invalid request: meeting ends past the last representable time")?;
            let busy = calendar
                .busy_intervals(&people, start, end)
                .context("Failed to read busy intervals")?;
            let conflicts = find_conflicts(start, length, &busy);

            if conflicts.is_empty() {
                println!("free");
            } else {
                for interval in conflicts {
                    println!("busy: {}", interval);
                }
            }
        }
        Commands::Load { data, issues } => {
            let (calendar, report) = load(&data, &settings)?;
            print_summary(&calendar, &report);
            if issues {
                for issue in &report.issues {
                    println!("{}: {}: {}", issue.line, issue.kind, issue.content);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path, settings: &Settings) -> Result<(Calendar, ImportReport)> {
    debug!(path = %path.display(), "loading calendar");
    load_calendar_file(path, &settings.time_format)
        .with_context(|| format!("Failed to read calendar file: {}", path.display()))
}

fn print_summary(calendar: &Calendar, report: &ImportReport) {
    println!("Lines read:       {}", report.lines_read);
    println!("People loaded:    {}", report.people_loaded);
    println!("Meetings loaded:  {}", report.meetings_loaded);
    println!("Lines skipped:    {}", report.issues.len());
    println!("People total:     {}", calendar.person_count());
    println!("Meetings total:   {}", calendar.busy_count());
}

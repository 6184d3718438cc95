//! Free-time resolution: generate candidates, fetch busy time, filter.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::filter_available;
use crate::calendar::BusySource;
use crate::config::TimeFormat;
use crate::conflict::meeting_end;
use crate::error::Result;
use crate::request::{render_timestamp, Query};
use crate::slots::generate_candidates;

/// Start times at which the requested meeting fits, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeTimes {
    pub freetimes: Vec<NaiveDateTime>,
}

impl FreeTimes {
    pub fn is_empty(&self) -> bool {
        self.freetimes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.freetimes.len()
    }

    /// # Errors
    /// Fails when `format.render` cannot render a naive timestamp.
    pub fn render(&self, format: &TimeFormat) -> Result<RenderedFreeTimes> {
        let freetimes = self
            .freetimes
            .iter()
            .map(|&ts| render_timestamp(ts, format))
            .collect::<Result<Vec<_>>>()?;
        Ok(RenderedFreeTimes { freetimes })
    }
}

/// [`FreeTimes`] in external text form: `{"freetimes": ["...", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFreeTimes {
    pub freetimes: Vec<String>,
}

/// Resolve every free start time for `query` against the busy intervals in `source`.
///
/// Busy time is fetched for the union of requested people over
/// `[earliest_start, latest_start + duration)`, which covers every candidate's
/// occupancy. With no people requested, or no candidate in the window, the source is
/// not consulted at all.
///
/// # Errors
/// Only errors returned by `source` are propagated.
pub fn find_free_times<S>(query: &Query, source: &S) -> Result<FreeTimes>
where
    S: BusySource + ?Sized,
{
    let duration = query.duration();
    let candidates = generate_candidates(
        query.earliest_start,
        query.latest_start,
        duration,
        query.office_hours,
        query.granularity(),
    );
    debug!(
        candidates = candidates.len(),
        office_hours = %query.office_hours,
        "generated candidate start times"
    );

    if candidates.is_empty() || query.person_ids.is_empty() {
        return Ok(FreeTimes {
            freetimes: candidates,
        });
    }

    let window_end = meeting_end(query.latest_start, duration);
    let busy = source.busy_intervals(&query.person_ids, query.earliest_start, window_end)?;
    debug!(
        people = query.person_ids.len(),
        busy = busy.len(),
        "fetched busy intervals"
    );

    let freetimes = filter_available(&candidates, duration, &busy);
    debug!(free = freetimes.len(), "filtered candidates");

    Ok(FreeTimes { freetimes })
}

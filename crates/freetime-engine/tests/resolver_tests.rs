//! End-to-end resolution tests against an in-memory calendar.

use std::cell::Cell;
use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use freetime_engine::error::Result;
use freetime_engine::{
    find_free_times, generate_candidates, BusyInterval, BusySource, Calendar, FreeTimeError,
    OfficeHours, PersonId, Query, TimeFormat,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn dt(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 2, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn office() -> OfficeHours {
    OfficeHours::new(8, 17).unwrap()
}

/// A calendar with `people` registered (id doubles as name).
fn calendar(people: &[&str]) -> Calendar {
    let mut cal = Calendar::new();
    for &id in people {
        cal.add_person(PersonId::from(id), id);
    }
    cal
}

fn busy(cal: &mut Calendar, who: &str, start: NaiveDateTime, end: NaiveDateTime) {
    cal.add_busy(&PersonId::from(who), start, end).unwrap();
}

fn query(people: &[&str], duration: u32, earliest: NaiveDateTime, latest: NaiveDateTime) -> Query {
    Query::new(
        people.iter().map(|&id| PersonId::from(id)),
        duration,
        earliest,
        latest,
        office(),
    )
}

/// Counts fetches so tests can tell whether the source was consulted.
struct CountingSource {
    inner: Calendar,
    calls: Cell<usize>,
}

impl BusySource for CountingSource {
    fn busy_intervals(
        &self,
        people: &BTreeSet<PersonId>,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Result<Vec<BusyInterval>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.busy_intervals(people, window_start, window_end)
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn no_people_returns_every_generated_slot() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 8, 0), dt(12, 17, 0));
    let source = CountingSource {
        inner: cal,
        calls: Cell::new(0),
    };

    let q = query(&[], 60, dt(12, 8, 0), dt(12, 16, 0));
    let free = find_free_times(&q, &source).unwrap();

    let expected = generate_candidates(
        q.earliest_start,
        q.latest_start,
        q.duration(),
        q.office_hours,
        q.granularity(),
    );
    assert_eq!(free.freetimes, expected);
    assert_eq!(source.calls.get(), 0, "no people means no busy lookup");
}

#[test]
fn whole_day_of_meetings_leaves_no_free_time() {
    let mut cal = calendar(&["ada", "bob", "cyd"]);
    busy(&mut cal, "ada", dt(11, 8, 0), dt(11, 17, 30));
    busy(&mut cal, "bob", dt(11, 8, 0), dt(11, 17, 30));

    let q = query(&["ada", "bob"], 90, dt(11, 11, 0), dt(11, 15, 30));
    let free = find_free_times(&q, &cal).unwrap();

    assert!(free.is_empty());
}

#[test]
fn single_lunch_break_slot() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 8, 0), dt(12, 12, 0));
    busy(&mut cal, "ada", dt(12, 13, 0), dt(12, 17, 0));

    let q = query(&["ada"], 60, dt(12, 8, 0), dt(12, 16, 0));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(free.freetimes, vec![dt(12, 12, 0)]);
}

#[test]
fn two_people_three_free_slots() {
    let mut cal = calendar(&["ada", "bob"]);
    busy(&mut cal, "ada", dt(12, 9, 0), dt(12, 12, 0));
    busy(&mut cal, "bob", dt(12, 13, 0), dt(12, 16, 0));

    let q = query(&["ada", "bob"], 60, dt(12, 8, 0), dt(12, 16, 0));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(free.freetimes, vec![dt(12, 8, 0), dt(12, 12, 0), dt(12, 16, 0)]);
}

#[test]
fn two_people_short_meetings() {
    let mut cal = calendar(&["ada", "bob"]);
    busy(&mut cal, "ada", dt(12, 9, 0), dt(12, 12, 0));
    busy(&mut cal, "bob", dt(12, 13, 0), dt(12, 16, 0));

    let q = query(&["ada", "bob"], 30, dt(12, 8, 0), dt(12, 16, 30));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(
        free.freetimes,
        vec![
            dt(12, 8, 0),
            dt(12, 8, 30),
            dt(12, 12, 0),
            dt(12, 12, 30),
            dt(12, 16, 0),
            dt(12, 16, 30),
        ]
    );
}

#[test]
fn free_slots_across_two_days() {
    let mut cal = calendar(&["ada", "bob"]);
    busy(&mut cal, "ada", dt(12, 13, 0), dt(12, 16, 0));
    busy(&mut cal, "bob", dt(13, 9, 0), dt(13, 12, 0));

    let q = query(&["ada", "bob"], 60, dt(12, 13, 0), dt(13, 10, 30));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(free.freetimes, vec![dt(12, 16, 0), dt(13, 8, 0)]);
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[test]
fn meetings_touching_busy_time_are_free() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 10, 0), dt(12, 11, 0));

    let q = query(&["ada"], 60, dt(12, 9, 0), dt(12, 11, 0));
    let free = find_free_times(&q, &cal).unwrap();

    // 09:00-10:00 ends as the block starts; 11:00-12:00 starts as it ends.
    assert_eq!(free.freetimes, vec![dt(12, 9, 0), dt(12, 11, 0)]);
}

#[test]
fn busy_time_after_latest_start_still_blocks() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 16, 30), dt(12, 17, 0));

    let q = query(&["ada"], 60, dt(12, 8, 0), dt(12, 16, 0));
    let free = find_free_times(&q, &cal).unwrap();

    assert!(!free.freetimes.contains(&dt(12, 16, 0)));
    assert_eq!(free.freetimes.last(), Some(&dt(12, 15, 30)));
}

#[test]
fn unknown_people_contribute_nothing() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 8, 0), dt(12, 17, 0));

    let q = query(&["nobody", "ghost"], 60, dt(12, 8, 0), dt(12, 9, 0));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(free.freetimes, vec![dt(12, 8, 0), dt(12, 8, 30), dt(12, 9, 0)]);
}

#[test]
fn busy_time_of_people_not_asked_is_ignored() {
    let mut cal = calendar(&["ada", "bob"]);
    busy(&mut cal, "bob", dt(12, 8, 0), dt(12, 17, 0));

    let q = query(&["ada"], 30, dt(12, 8, 0), dt(12, 8, 30));
    let free = find_free_times(&q, &cal).unwrap();

    assert_eq!(free.len(), 2);
}

#[test]
fn empty_window_skips_busy_lookup() {
    let source = CountingSource {
        inner: calendar(&["ada"]),
        calls: Cell::new(0),
    };
    let q = query(&["ada"], 60, dt(12, 17, 0), dt(12, 18, 0));

    assert!(find_free_times(&q, &source).unwrap().is_empty());
    assert_eq!(source.calls.get(), 0);
}

#[test]
fn resolution_is_repeatable() {
    let mut cal = calendar(&["ada", "bob"]);
    busy(&mut cal, "ada", dt(12, 9, 0), dt(12, 10, 0));
    busy(&mut cal, "bob", dt(12, 9, 30), dt(12, 11, 0));

    let q = query(&["bob", "ada"], 45, dt(12, 8, 0), dt(13, 12, 0));
    let first = find_free_times(&q, &cal).unwrap();
    let second = find_free_times(&q, &cal).unwrap();

    assert_eq!(first, second);
}

#[test]
fn coarser_granularity_thins_candidates() {
    let q = query(&[], 60, dt(12, 8, 0), dt(12, 16, 0)).with_granularity(120);
    let free = find_free_times(&q, &calendar(&[])).unwrap();

    assert_eq!(
        free.freetimes,
        vec![dt(12, 8, 0), dt(12, 10, 0), dt(12, 12, 0), dt(12, 14, 0), dt(12, 16, 0)]
    );
}

// ── Rendering ───────────────────────────────────────────────────────────────

#[test]
fn rendered_with_default_format() {
    let mut cal = calendar(&["ada"]);
    busy(&mut cal, "ada", dt(12, 8, 0), dt(12, 12, 0));
    busy(&mut cal, "ada", dt(12, 13, 0), dt(12, 17, 0));

    let q = query(&["ada"], 60, dt(12, 8, 0), dt(12, 16, 0));
    let rendered = find_free_times(&q, &cal)
        .unwrap()
        .render(&TimeFormat::default())
        .unwrap();

    assert_eq!(rendered.freetimes, vec!["02/12/2023 12:00:00 PM".to_string()]);
    assert_eq!(
        serde_json::to_string(&rendered).unwrap(),
        r#"{"freetimes":["02/12/2023 12:00:00 PM"]}"#
    );
}

#[test]
fn rendered_with_custom_format() {
    let format = TimeFormat {
        parse: "%Y-%m-%dT%H:%M:%S".to_string(),
        render: "%Y-%m-%d %H:%M".to_string(),
    };
    let q = query(&[], 30, dt(12, 16, 30), dt(12, 16, 30));
    let rendered = find_free_times(&q, &calendar(&[]))
        .unwrap()
        .render(&format)
        .unwrap();

    assert_eq!(rendered.freetimes, vec!["2023-02-12 16:30".to_string()]);
}

#[test]
fn render_with_offset_pattern_is_an_error() {
    let format = TimeFormat {
        parse: TimeFormat::default().parse,
        render: "%Y-%m-%d %z".to_string(),
    };
    let q = query(&[], 30, dt(12, 16, 30), dt(12, 16, 30));
    let err = find_free_times(&q, &calendar(&[]))
        .unwrap()
        .render(&format)
        .unwrap_err();

    assert!(matches!(err, FreeTimeError::InvalidConfig(_)));
}

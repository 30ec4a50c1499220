//! Tests for the closed-world availability store.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::{AvailabilityStore, FreeBusyInterval, FreeBusyStatus};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 12, 1, hour, min, 0).unwrap()
}

fn interval(
    participant: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: FreeBusyStatus,
) -> FreeBusyInterval {
    FreeBusyInterval {
        participant: participant.to_string(),
        start,
        end,
        status,
    }
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn busy_intervals_are_ignored_on_construction() {
    // Absence of free already means busy; an explicit busy entry adds nothing.
    let store = AvailabilityStore::from_intervals(&[
        interval("p1@example.com", at(9, 0), at(10, 0), FreeBusyStatus::Free),
        interval("p1@example.com", at(10, 0), at(11, 0), FreeBusyStatus::Busy),
    ]);

    assert!(store.is_free("p1@example.com", at(9, 0), at(10, 0)));
    assert!(!store.is_free("p1@example.com", at(10, 0), at(10, 15)));
}

#[test]
fn overlapping_and_adjacent_free_intervals_merge() {
    let store = AvailabilityStore::from_intervals(&[
        interval("p1@example.com", at(9, 0), at(10, 0), FreeBusyStatus::Free),
        interval("p1@example.com", at(9, 30), at(10, 30), FreeBusyStatus::Free),
        interval("p1@example.com", at(10, 30), at(11, 0), FreeBusyStatus::Free),
    ]);

    // A span crossing all three source intervals is free only because they
    // merged into one 09:00-11:00 range.
    assert!(store.is_free("p1@example.com", at(9, 15), at(10, 45)));
    assert!(!store.is_free("p1@example.com", at(9, 0), at(11, 15)));
}

#[test]
fn inverted_intervals_are_discarded() {
    let store = AvailabilityStore::from_intervals(&[interval(
        "p1@example.com",
        at(10, 0),
        at(9, 0),
        FreeBusyStatus::Free,
    )]);

    assert!(!store.is_free("p1@example.com", at(9, 0), at(9, 15)));
    assert_eq!(store.participants().count(), 0);
}

// ── Closed-world queries ────────────────────────────────────────────────────

#[test]
fn unknown_participant_is_busy_everywhere() {
    let store = AvailabilityStore::default();
    assert!(!store.is_free("nobody@example.com", at(9, 0), at(9, 15)));
}

#[test]
fn partial_coverage_is_not_free() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(9, 0), at(9, 30));

    assert!(store.is_free("p1@example.com", at(9, 0), at(9, 30)));
    assert!(!store.is_free("p1@example.com", at(9, 15), at(9, 45)));
}

#[test]
fn all_free_requires_every_participant() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(9, 0), at(10, 0));
    store.mark_free("p2@example.com", at(9, 30), at(10, 0));

    let both = vec!["p1@example.com".to_string(), "p2@example.com".to_string()];
    assert!(store.all_free(&both, at(9, 30), at(10, 0)));
    assert!(!store.all_free(&both, at(9, 0), at(9, 30)));

    // An empty participant set is trivially free.
    assert!(store.all_free(&[], at(0, 0), at(23, 0)));
}

#[test]
fn participants_lists_everyone_with_free_time() {
    let mut store = AvailabilityStore::default();
    store.mark_free("a@example.com", at(9, 0), at(10, 0));
    store.mark_free("b@example.com", at(9, 0), at(10, 0));

    let names: Vec<&String> = store.participants().collect();
    assert_eq!(names.len(), 2);
    assert_eq!(names[0], "a@example.com");
}

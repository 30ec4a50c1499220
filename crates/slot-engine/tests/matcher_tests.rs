//! Tests for consecutive slot matching.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::matcher::{
    grid_unit_minutes, match_consecutive, validate_candidates, MeetingSpec, SlotCombination,
    SlotEvent,
};
use slot_engine::{AvailabilityStore, SlotError};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn spec(title: &str, minutes: u32, participants: &[&str]) -> MeetingSpec {
    MeetingSpec {
        event_title: Some(title.to_string()),
        event_description: None,
        slot_size_minutes: minutes,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// An instant on the fixture day (2021-12-01).
fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 12, 1, hour, min, 0).unwrap()
}

fn emails(participants: &[&str]) -> BTreeSet<String> {
    participants.iter().map(|p| p.to_string()).collect()
}

// ── Basic matching ──────────────────────────────────────────────────────────

#[test]
fn single_meeting_slides_across_its_free_window() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(14, 0), at(14, 30));

    let specs = vec![spec("Intro", 15, &["p1@example.com"])];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();

    // 14:00-14:15 and 14:15-14:30 are the only free placements.
    assert_eq!(combos.len(), 2);
    assert_eq!(combos[0].events[0].start, at(14, 0));
    assert_eq!(combos[1].events[0].start, at(14, 15));
}

#[test]
fn every_emitted_combination_is_contiguous_and_free() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(9, 0), at(12, 0));
    store.mark_free("p2@example.com", at(10, 0), at(11, 0));

    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 30, &["p2@example.com"]),
    ];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();

    assert!(!combos.is_empty());
    for combo in &combos {
        assert!(combo.is_contiguous());
        for event in &combo.events {
            assert!(
                store.all_free(&event.participants, event.start, event.end),
                "interval {}..{} not free for all participants",
                event.start,
                event.end
            );
        }
    }
}

// ── Scenario: two 15-minute meetings, staggered free windows ────────────────

#[test]
fn staggered_windows_admit_only_orderings_inside_both_windows() {
    // P1 free 14:00-14:30, P2 free 14:15-15:00.
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(14, 0), at(14, 30));
    store.mark_free("p2@example.com", at(14, 15), at(15, 0));

    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p2@example.com"]),
    ];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();

    // Valid layouts: meeting1 14:00-14:15 then meeting2 14:15-14:30, and
    // meeting1 14:15-14:30 then meeting2 14:30-14:45. Meeting2 can never go
    // first: its participant is busy before 14:15, and once meeting2 holds
    // 14:15-14:30 its successor interval falls outside P1's window.
    assert_eq!(combos.len(), 2);
    for combo in &combos {
        assert_eq!(combo.events[0].meeting_index, 0);
        assert_eq!(combo.events[1].meeting_index, 1);
    }
    assert_eq!(combos[0].start(), at(14, 0));
    assert_eq!(combos[0].end(), at(14, 30));
    assert_eq!(combos[1].start(), at(14, 15));
    assert_eq!(combos[1].end(), at(14, 45));
}

// ── Closed-world availability ───────────────────────────────────────────────

#[test]
fn participant_without_data_is_busy_everywhere() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(9, 0), at(17, 0));

    // p2 has no intervals at all, so no combination can place meeting2.
    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p2@example.com"]),
    ];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();
    assert!(combos.is_empty());
}

#[test]
fn zero_participant_meeting_is_trivially_satisfied() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(10, 0), at(10, 30));

    let specs = vec![spec("Intro", 15, &["p1@example.com"]), spec("Hold", 15, &[])];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();

    // The hold slot can sit on either side of the intro slot.
    assert!(!combos.is_empty());
    assert!(combos.iter().all(|c| c.is_contiguous()));
}

#[test]
fn shared_participant_may_attend_back_to_back_meetings() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(10, 0), at(10, 30));

    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p1@example.com"]),
    ];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap();

    // Both orderings fit 10:00-10:30; each interval is individually free.
    assert_eq!(combos.len(), 2);
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn empty_request_is_rejected() {
    let store = AvailabilityStore::default();
    let err = match_consecutive(&[], &store, at(9, 0), at(17, 0)).unwrap_err();
    assert!(matches!(err, SlotError::EmptyRequest));
}

#[test]
fn zero_duration_meeting_is_rejected_with_its_index() {
    let store = AvailabilityStore::default();
    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Broken", 0, &["p2@example.com"]),
    ];
    let err = match_consecutive(&specs, &store, at(9, 0), at(17, 0)).unwrap_err();
    match err {
        SlotError::InvalidMeeting { index, .. } => assert_eq!(index, 1),
        other => panic!("expected InvalidMeeting, got {other:?}"),
    }
}

// ── Grid discretization ─────────────────────────────────────────────────────

#[test]
fn grid_unit_is_gcd_of_slot_sizes() {
    let specs = vec![spec("A", 20, &["x"]), spec("B", 30, &["x"])];
    assert_eq!(grid_unit_minutes(&specs), 10);

    let specs = vec![spec("A", 15, &["x"]), spec("B", 15, &["x"])];
    assert_eq!(grid_unit_minutes(&specs), 15);

    let specs = vec![spec("A", 7, &["x"]), spec("B", 13, &["x"])];
    assert_eq!(grid_unit_minutes(&specs), 1);
}

#[test]
fn candidate_starts_align_to_the_gcd_grid() {
    let mut store = AvailabilityStore::default();
    store.mark_free("p1@example.com", at(9, 0), at(11, 0));

    let specs = vec![spec("A", 20, &["p1@example.com"]), spec("B", 30, &["p1@example.com"])];
    let combos = match_consecutive(&specs, &store, at(9, 0), at(11, 0)).unwrap();

    assert!(!combos.is_empty());
    for combo in &combos {
        let offset = combo.start() - at(9, 0);
        assert_eq!(offset.num_minutes() % 10, 0, "start not on the 10-minute grid");
    }
}

// ── Candidate validation mode ───────────────────────────────────────────────

fn candidate(events: Vec<(usize, DateTime<Utc>, DateTime<Utc>, &[&str])>) -> SlotCombination {
    SlotCombination {
        events: events
            .into_iter()
            .map(|(meeting_index, start, end, participants)| SlotEvent {
                meeting_index,
                start,
                end,
                participants: emails(participants),
            })
            .collect(),
    }
}

#[test]
fn well_formed_candidates_are_accepted_and_time_sorted() {
    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p2@example.com"]),
    ];
    // Events arrive in meeting order, not time order.
    let candidates = vec![candidate(vec![
        (1, at(14, 0), at(14, 15), &["p2@example.com"]),
        (0, at(14, 15), at(14, 30), &["p1@example.com"]),
    ])];

    let validated = validate_candidates(&specs, candidates).unwrap();
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].events[0].meeting_index, 1);
    assert_eq!(validated[0].events[0].start, at(14, 0));
    assert!(validated[0].is_contiguous());
}

#[test]
fn candidate_with_gap_is_rejected() {
    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p2@example.com"]),
    ];
    let candidates = vec![candidate(vec![
        (0, at(14, 0), at(14, 15), &["p1@example.com"]),
        (1, at(14, 30), at(14, 45), &["p2@example.com"]),
    ])];

    let err = validate_candidates(&specs, candidates).unwrap_err();
    assert!(matches!(err, SlotError::InvalidCandidate { index: 0, .. }));
}

#[test]
fn candidate_with_wrong_duration_is_rejected() {
    let specs = vec![spec("Intro", 15, &["p1@example.com"])];
    let candidates = vec![candidate(vec![(
        0,
        at(14, 0),
        at(14, 30),
        &["p1@example.com"],
    )])];

    let err = validate_candidates(&specs, candidates).unwrap_err();
    assert!(matches!(err, SlotError::InvalidCandidate { index: 0, .. }));
}

#[test]
fn candidate_events_inherit_participants_from_their_spec() {
    let specs = vec![spec("Intro", 15, &["p1@example.com", "p2@example.com"])];
    // The middleware response carries only times; participants come from the spec.
    let candidates = vec![candidate(vec![(0, at(14, 0), at(14, 15), &[])])];

    let validated = validate_candidates(&specs, candidates).unwrap();
    assert_eq!(
        validated[0].events[0].participants,
        emails(&["p1@example.com", "p2@example.com"])
    );
}

#[test]
fn candidate_assigning_a_meeting_twice_is_rejected() {
    let specs = vec![
        spec("Intro", 15, &["p1@example.com"]),
        spec("Closing", 15, &["p2@example.com"]),
    ];
    let candidates = vec![candidate(vec![
        (0, at(14, 0), at(14, 15), &["p1@example.com"]),
        (0, at(14, 15), at(14, 30), &["p1@example.com"]),
    ])];

    let err = validate_candidates(&specs, candidates).unwrap_err();
    assert!(matches!(err, SlotError::InvalidCandidate { index: 0, .. }));
}

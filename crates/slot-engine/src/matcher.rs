//! Consecutive-meeting slot matching.
//!
//! Given an ordered list of meeting specs (duration + participants each) and
//! an availability snapshot, finds every way to lay the meetings out
//! back-to-back so that each meeting's participants are free for its whole
//! interval. The candidate grid is aligned to the GCD of the requested slot
//! sizes. The meeting order in the request does not constrain which meeting
//! lands in which interval — every permutation is tried, and the
//! deduplication stage collapses permutations that produce the same
//! wall-clock partition.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SlotError};
use crate::freebusy::AvailabilityStore;

/// One meeting in a consecutive-booking request.
///
/// Immutable once a matching pass begins. The request-list order matters only
/// for labeling (`meeting_index`); validity of a combination never depends on
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSpec {
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub event_description: Option<String>,
    /// Duration of this meeting in minutes.
    pub slot_size_minutes: u32,
    /// Participant identifiers (email addresses) required in this meeting.
    pub participants: BTreeSet<String>,
}

impl MeetingSpec {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_size_minutes))
    }
}

/// One scheduled interval within a combination: which meeting it carries,
/// when it runs, and who attends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvent {
    /// Index into the request's MeetingSpec list.
    pub meeting_index: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participants: BTreeSet<String>,
}

/// A fully-contiguous, fully-free assignment of intervals to every meeting
/// in the request, ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCombination {
    pub events: Vec<SlotEvent>,
}

impl SlotCombination {
    /// Start of the first interval. Combinations are never empty — the
    /// matcher rejects empty requests before producing any.
    pub fn start(&self) -> DateTime<Utc> {
        self.events[0].start
    }

    /// End of the last interval.
    pub fn end(&self) -> DateTime<Utc> {
        self.events[self.events.len() - 1].end
    }

    /// Whether consecutive events line up exactly (no gap, no overlap).
    pub fn is_contiguous(&self) -> bool {
        self.events
            .windows(2)
            .all(|pair| pair[0].end == pair[1].start)
    }

    /// Whether `[start, end)` of any event covers the given instant range.
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.events
            .iter()
            .any(|event| event.start <= start && end <= event.end)
    }
}

/// Validate a request's meeting specs before a matching pass.
///
/// Zero-duration meetings are rejected with the offending index; the pass
/// must not proceed on malformed input. An empty participant set is accepted
/// (trivially free) but logged, since it books an interval nobody attends.
pub fn validate_specs(specs: &[MeetingSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(SlotError::EmptyRequest);
    }
    for (index, spec) in specs.iter().enumerate() {
        if spec.slot_size_minutes == 0 {
            return Err(SlotError::InvalidMeeting {
                index,
                reason: "slot size must be greater than zero".to_string(),
            });
        }
        if spec.participants.is_empty() {
            warn!(meeting_index = index, "meeting has no participants; any interval satisfies it");
        }
    }
    Ok(())
}

/// Grid unit for candidate start times, in minutes: the GCD of all slot
/// sizes. Slot sizes are integral minutes, so a common unit always exists;
/// a degenerate 1-minute unit is accepted rather than coarsened.
pub fn grid_unit_minutes(specs: &[MeetingSpec]) -> u32 {
    specs
        .iter()
        .map(|s| s.slot_size_minutes)
        .fold(0, gcd)
        .max(1)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Find every valid consecutive combination within `[window_start, window_end)`.
///
/// For each grid-aligned candidate start and each permutation of the meetings
/// laid out contiguously from it, a combination is emitted when every
/// meeting's participants are free for the interval that permutation assigns
/// to it. Emitted combinations are time-ordered and strictly contiguous by
/// construction; duplicates differing only in meeting assignment are the
/// deduplicator's concern.
///
/// A participant may appear in several meetings of one combination — each
/// interval is checked independently, so back-to-back attendance is allowed
/// whenever each interval is individually free for them.
///
/// # Errors
/// Returns `SlotError::EmptyRequest` or `SlotError::InvalidMeeting` when the
/// request fails validation; no partial output is produced.
pub fn match_consecutive(
    specs: &[MeetingSpec],
    store: &AvailabilityStore,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<SlotCombination>> {
    validate_specs(specs)?;

    let unit = Duration::minutes(i64::from(grid_unit_minutes(specs)));
    let total = specs
        .iter()
        .fold(Duration::zero(), |acc, spec| acc + spec.duration());

    debug!(
        meetings = specs.len(),
        grid_unit_minutes = grid_unit_minutes(specs),
        "starting consecutive matching pass"
    );

    let orderings = permutations(specs.len());
    let mut combinations = Vec::new();

    let mut candidate_start = window_start;
    while candidate_start + total <= window_end {
        for ordering in &orderings {
            if let Some(combination) = layout(specs, store, candidate_start, ordering) {
                combinations.push(combination);
            }
        }
        candidate_start += unit;
    }

    debug!(
        combinations = combinations.len(),
        "consecutive matching pass complete"
    );
    Ok(combinations)
}

/// Lay the meetings out contiguously from `start` in the given order,
/// returning the combination when every interval is free for its meeting's
/// participants.
fn layout(
    specs: &[MeetingSpec],
    store: &AvailabilityStore,
    start: DateTime<Utc>,
    ordering: &[usize],
) -> Option<SlotCombination> {
    let mut cursor = start;
    let mut events = Vec::with_capacity(ordering.len());

    for &meeting_index in ordering {
        let spec = &specs[meeting_index];
        let end = cursor + spec.duration();
        if !store.all_free(&spec.participants, cursor, end) {
            return None;
        }
        events.push(SlotEvent {
            meeting_index,
            start: cursor,
            end,
            participants: spec.participants.clone(),
        });
        cursor = end;
    }

    Some(SlotCombination { events })
}

/// All permutations of `0..n`, in lexicographic order.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(n);
    let mut used = vec![false; n];
    permute(n, &mut current, &mut used, &mut result);
    result
}

fn permute(n: usize, current: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
    if current.len() == n {
        out.push(current.clone());
        return;
    }
    for i in 0..n {
        if !used[i] {
            used[i] = true;
            current.push(i);
            permute(n, current, used, out);
            current.pop();
            used[i] = false;
        }
    }
}

/// Validate pre-grouped candidate combinations from the availability service.
///
/// The production fetch may return ranked candidate sets instead of raw
/// intervals; in that mode the service owns the free/busy data and the engine
/// only re-validates structure before re-deduplicating. Checks per candidate:
/// one event per meeting, `meeting_index` a permutation of the request,
/// durations matching each assigned spec, and strict contiguity once sorted
/// by start. Events with an empty participant set inherit the assigned
/// spec's participants.
///
/// # Errors
/// Returns `SlotError::InvalidCandidate` naming the first offending
/// candidate; no partial output is produced.
pub fn validate_candidates(
    specs: &[MeetingSpec],
    candidates: Vec<SlotCombination>,
) -> Result<Vec<SlotCombination>> {
    validate_specs(specs)?;

    let mut validated = Vec::with_capacity(candidates.len());
    for (index, mut candidate) in candidates.into_iter().enumerate() {
        if candidate.events.len() != specs.len() {
            return Err(SlotError::InvalidCandidate {
                index,
                reason: format!(
                    "expected {} events, got {}",
                    specs.len(),
                    candidate.events.len()
                ),
            });
        }

        let mut seen = vec![false; specs.len()];
        for event in &mut candidate.events {
            let Some(spec) = specs.get(event.meeting_index) else {
                return Err(SlotError::InvalidCandidate {
                    index,
                    reason: format!("meeting index {} out of range", event.meeting_index),
                });
            };
            if seen[event.meeting_index] {
                return Err(SlotError::InvalidCandidate {
                    index,
                    reason: format!("meeting index {} assigned twice", event.meeting_index),
                });
            }
            seen[event.meeting_index] = true;

            if event.end - event.start != spec.duration() {
                return Err(SlotError::InvalidCandidate {
                    index,
                    reason: format!(
                        "event for meeting {} is {} minutes, spec says {}",
                        event.meeting_index,
                        (event.end - event.start).num_minutes(),
                        spec.slot_size_minutes
                    ),
                });
            }
            if event.participants.is_empty() {
                event.participants = spec.participants.clone();
            }
        }

        candidate.events.sort_by_key(|e| e.start);
        if !candidate.is_contiguous() {
            return Err(SlotError::InvalidCandidate {
                index,
                reason: "events are not contiguous".to_string(),
            });
        }

        validated.push(candidate);
    }

    Ok(validated)
}

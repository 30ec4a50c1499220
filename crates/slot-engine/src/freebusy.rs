//! Per-participant free/busy intervals and the closed-world availability store.
//!
//! Raw intervals arrive from the availability fetch, one list entry per
//! participant/time-range pair. The store keeps only the `free` intervals,
//! merged per participant; any instant not covered by a free interval is
//! treated as busy (closed-world), which matches the widget's default
//! "slot.busy" classification.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free/busy status of a raw interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeBusyStatus {
    Free,
    Busy,
}

/// A raw per-participant interval as returned by the availability fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeBusyInterval {
    /// Participant identifier (an email address in practice).
    pub participant: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: FreeBusyStatus,
}

/// Merged per-participant free intervals for one availability snapshot.
///
/// Construction discards `busy` entries — absence of a free interval already
/// means busy — and merges overlapping or adjacent free intervals so that
/// containment checks are a single scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityStore {
    free: BTreeMap<String, Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl AvailabilityStore {
    /// Build a store from raw fetch intervals.
    pub fn from_intervals(intervals: &[FreeBusyInterval]) -> Self {
        let mut per_participant: BTreeMap<String, Vec<(DateTime<Utc>, DateTime<Utc>)>> =
            BTreeMap::new();

        for interval in intervals {
            if interval.status != FreeBusyStatus::Free || interval.start >= interval.end {
                continue;
            }
            per_participant
                .entry(interval.participant.clone())
                .or_default()
                .push((interval.start, interval.end));
        }

        for ranges in per_participant.values_mut() {
            *ranges = merge_ranges(std::mem::take(ranges));
        }

        AvailabilityStore {
            free: per_participant,
        }
    }

    /// Mark a participant free for a range. Test and fixture convenience;
    /// ranges are re-merged on every call.
    pub fn mark_free(&mut self, participant: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        if start >= end {
            return;
        }
        let ranges = self.free.entry(participant.to_string()).or_default();
        ranges.push((start, end));
        *ranges = merge_ranges(std::mem::take(ranges));
    }

    /// Whether `participant` is free for the whole of `[start, end)`.
    ///
    /// Closed-world: a participant with no free intervals at all is busy
    /// everywhere.
    pub fn is_free(&self, participant: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        if start >= end {
            return true;
        }
        let Some(ranges) = self.free.get(participant) else {
            return false;
        };
        ranges
            .iter()
            .any(|&(free_start, free_end)| free_start <= start && end <= free_end)
    }

    /// Whether every participant in the iterator is free for `[start, end)`.
    ///
    /// An empty iterator is trivially free.
    pub fn all_free<'a>(
        &self,
        participants: impl IntoIterator<Item = &'a String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        participants
            .into_iter()
            .all(|p| self.is_free(p, start, end))
    }

    /// The participants this store has any free interval for.
    pub fn participants(&self) -> impl Iterator<Item = &String> {
        self.free.keys()
    }
}

/// Merge overlapping or adjacent `(start, end)` ranges.
///
/// Returns a sorted, non-overlapping list.
fn merge_ranges(
    mut ranges: Vec<(DateTime<Utc>, DateTime<Utc>)>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if ranges.is_empty() {
        return ranges;
    }

    // Sort by start time (then by end time for stability).
    ranges.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in ranges {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent — extend the current range.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

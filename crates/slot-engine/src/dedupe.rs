//! Collapse combinations that differ only in meeting-to-slot assignment.
//!
//! Two combinations are equivalent when, sorted by start time, their
//! `(start, end, participant-set)` sequences are identical — which meeting
//! index produced which slot is ignored. Each equivalence class becomes one
//! bookable option; every member permutation is kept so the display layer can
//! label sub-events in whichever order their meetings actually occupy
//! ("Intro then Closing" in one member, the reverse in another).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matcher::SlotCombination;

/// One bookable option: the canonical combination used for equality,
/// selection, and booking, plus every member permutation sharing its
/// wall-clock partition, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableOption {
    pub canonical: SlotCombination,
    pub members: Vec<SlotCombination>,
}

/// The equivalence key of a combination: its time partition with participant
/// sets, meeting indices erased.
type PartitionKey = Vec<(DateTime<Utc>, DateTime<Utc>, BTreeSet<String>)>;

fn partition_key(combination: &SlotCombination) -> PartitionKey {
    let mut key: PartitionKey = combination
        .events
        .iter()
        .map(|e| (e.start, e.end, e.participants.clone()))
        .collect();
    key.sort();
    key
}

/// Group combinations into equivalence classes and pick each class's
/// canonical representative.
///
/// The canonical combination is time-ordered; among members it is the one
/// with the lexicographically smallest meeting-index sequence, so repeated
/// runs over the same input pick the same representative. Output is sorted
/// by earliest start ascending, ties broken by lexicographic comparison of
/// participant identifiers. Idempotent: deduplicating the canonicals of the
/// output reproduces the output.
pub fn dedupe(combinations: Vec<SlotCombination>) -> Vec<SelectableOption> {
    let mut classes: BTreeMap<PartitionKey, Vec<SlotCombination>> = BTreeMap::new();

    for mut combination in combinations {
        combination.events.sort_by_key(|e| e.start);
        let key = partition_key(&combination);
        let members = classes.entry(key).or_default();
        // Exact duplicates (same meeting assignment) collapse outright.
        if !members.contains(&combination) {
            members.push(combination);
        }
    }

    let mut options: Vec<SelectableOption> = classes
        .into_values()
        .map(|mut members| {
            members.sort_by_key(|m| index_sequence(m));
            let canonical = members[0].clone();
            SelectableOption { canonical, members }
        })
        .collect();

    options.sort_by(|a, b| {
        a.canonical
            .start()
            .cmp(&b.canonical.start())
            .then_with(|| participant_order(&a.canonical).cmp(&participant_order(&b.canonical)))
    });

    options
}

fn index_sequence(combination: &SlotCombination) -> Vec<usize> {
    combination.events.iter().map(|e| e.meeting_index).collect()
}

/// Flattened participant identifiers of a time-ordered combination, used as
/// the deterministic tie-breaker for options starting at the same instant.
fn participant_order(combination: &SlotCombination) -> Vec<&String> {
    combination
        .events
        .iter()
        .flat_map(|e| e.participants.iter())
        .collect()
}

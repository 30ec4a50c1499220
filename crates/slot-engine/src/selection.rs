//! Selection state and free/busy/selected grid classification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dedupe::SelectableOption;
use crate::freebusy::AvailabilityStore;

/// Whether an option is currently selected.
///
/// At most one option is selected at a time; selecting a new option
/// implicitly deselects the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(SelectableOption),
}

impl SelectionState {
    /// Select an option. Last-write-wins: any previous selection is
    /// replaced without error.
    pub fn select(&mut self, option: SelectableOption) {
        *self = SelectionState::Selected(option);
    }

    /// Return to the unselected state. A no-op when nothing is selected.
    pub fn deselect(&mut self) {
        *self = SelectionState::Unselected;
    }

    pub fn selected(&self) -> Option<&SelectableOption> {
        match self {
            SelectionState::Selected(option) => Some(option),
            SelectionState::Unselected => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionState::Selected(_))
    }
}

/// Three-way display state of a time grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotClass {
    Free,
    Busy,
    Selected,
}

/// One displayed grid cell with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub class: SlotClass,
}

/// Classify every grid cell in `[window_start, window_end)` at the given
/// unit.
///
/// A cell covered by the selected option's canonical combination is
/// `selected`. Otherwise it is `free` when every requested participant is
/// free for the whole cell, `busy` otherwise — including when the store has
/// no data at all for a participant (closed-world). Deselecting therefore
/// restores the plain free/busy classification exactly.
pub fn classify_grid<'a>(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    unit_minutes: u32,
    participants: impl IntoIterator<Item = &'a String> + Clone,
    store: &AvailabilityStore,
    selection: &SelectionState,
) -> Vec<GridCell> {
    let unit = Duration::minutes(i64::from(unit_minutes.max(1)));
    let mut cells = Vec::new();
    let mut cursor = window_start;

    while cursor + unit <= window_end {
        let end = cursor + unit;
        let class = if selection
            .selected()
            .is_some_and(|option| option.canonical.covers(cursor, end))
        {
            SlotClass::Selected
        } else if store.all_free(participants.clone(), cursor, end) {
            SlotClass::Free
        } else {
            SlotClass::Busy
        };
        cells.push(GridCell {
            start: cursor,
            end,
            class,
        });
        cursor = end;
    }

    cells
}

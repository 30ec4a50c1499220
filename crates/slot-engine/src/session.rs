//! Scheduling-session lifecycle: meeting edits, availability refreshes, and
//! selection against the current option list.
//!
//! Everything here runs synchronously in response to discrete actions. The
//! one asynchronous collaborator — the availability fetch — is represented by
//! a generation token: starting a new fetch (or editing the meetings)
//! supersedes any in-flight fetch, and only a result carrying the current
//! token is applied. A matcher pass always runs to completion before a
//! selection can be made against its output, so no selection ever lands on a
//! half-built option list.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::dedupe::{dedupe, SelectableOption};
use crate::error::{Result, SlotError};
use crate::freebusy::AvailabilityStore;
use crate::gate::{can_book, default_fields, CustomField};
use crate::matcher::{match_consecutive, validate_candidates, validate_specs, MeetingSpec, SlotCombination};
use crate::selection::{classify_grid, GridCell, SelectionState};

/// Identifies one availability fetch. Results carrying a superseded token
/// are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// One consecutive-booking session: the meeting specs, the current option
/// list, the selection, and the booking-form fields.
#[derive(Debug, Clone)]
pub struct SchedulerSession {
    specs: Vec<MeetingSpec>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    store: Option<AvailabilityStore>,
    options: Vec<SelectableOption>,
    selection: SelectionState,
    fields: Vec<CustomField>,
    generation: u64,
}

impl SchedulerSession {
    /// Start a session for the given meetings and date window.
    ///
    /// Specs are validated up front; the session begins with no options, no
    /// selection, and the default booking-form fields.
    pub fn new(
        specs: Vec<MeetingSpec>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Self> {
        validate_specs(&specs)?;
        Ok(SchedulerSession {
            specs,
            window_start,
            window_end,
            store: None,
            options: Vec::new(),
            selection: SelectionState::Unselected,
            fields: default_fields(),
            generation: 0,
        })
    }

    /// Replace the default booking-form fields with a configured set.
    pub fn set_fields(&mut self, fields: Vec<CustomField>) {
        self.fields = fields;
    }

    pub fn specs(&self) -> &[MeetingSpec] {
        &self.specs
    }

    pub fn options(&self) -> &[SelectableOption] {
        &self.options
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn fields(&self) -> &[CustomField] {
        &self.fields
    }

    /// Append a meeting to the request. Clears the selection and the stale
    /// option list, and supersedes any in-flight fetch.
    pub fn add_meeting(&mut self, spec: MeetingSpec) {
        self.specs.push(spec);
        self.invalidate();
    }

    /// Remove a meeting from the request. Clears the selection and the stale
    /// option list, and supersedes any in-flight fetch.
    ///
    /// # Errors
    /// `SlotError::InvalidMeeting` when no meeting exists at `index`.
    pub fn remove_meeting(&mut self, index: usize) -> Result<()> {
        if index >= self.specs.len() {
            return Err(SlotError::InvalidMeeting {
                index,
                reason: "no meeting at this index".to_string(),
            });
        }
        self.specs.remove(index);
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.selection.deselect();
        self.options.clear();
        self.store = None;
        self.generation += 1;
    }

    /// Start an availability fetch, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchToken {
        self.generation += 1;
        FetchToken(self.generation)
    }

    /// Apply the result of a raw free/busy fetch.
    ///
    /// Stale tokens are discarded without touching any state (`Ok(false)`).
    /// A failed fetch leaves the previous options and selection unchanged
    /// and surfaces a retryable [`SlotError::FetchFailed`] — no partial
    /// option list is ever shown. On success a full matcher + dedupe pass
    /// replaces the option list and clears the selection, which predates the
    /// new data.
    pub fn apply_availability(
        &mut self,
        token: FetchToken,
        result: std::result::Result<AvailabilityStore, String>,
    ) -> Result<bool> {
        if token.0 != self.generation {
            warn!(token = token.0, current = self.generation, "discarding stale availability result");
            return Ok(false);
        }
        let store = result.map_err(|message| SlotError::FetchFailed { message })?;
        let combinations =
            match_consecutive(&self.specs, &store, self.window_start, self.window_end)?;
        self.replace_options(dedupe(combinations));
        self.store = Some(store);
        Ok(true)
    }

    /// Apply pre-grouped candidate combinations from the availability
    /// service (the fetch's alternate response shape). Same staleness,
    /// failure, and replacement rules as [`Self::apply_availability`].
    pub fn apply_candidates(
        &mut self,
        token: FetchToken,
        result: std::result::Result<Vec<SlotCombination>, String>,
    ) -> Result<bool> {
        if token.0 != self.generation {
            warn!(token = token.0, current = self.generation, "discarding stale candidate result");
            return Ok(false);
        }
        let candidates = result.map_err(|message| SlotError::FetchFailed { message })?;
        let validated = validate_candidates(&self.specs, candidates)?;
        self.replace_options(dedupe(validated));
        self.store = None;
        Ok(true)
    }

    fn replace_options(&mut self, options: Vec<SelectableOption>) {
        self.options = options;
        self.selection.deselect();
    }

    /// Select the option at `index` in the current list.
    ///
    /// A click that arrives for an option no longer present (the list was
    /// replaced or cleared underneath it) is silently ignored, since the
    /// user action predates the current data. Returns whether the selection
    /// was applied.
    pub fn select(&mut self, index: usize) -> bool {
        match self.options.get(index) {
            Some(option) => {
                self.selection.select(option.clone());
                true
            }
            None => {
                warn!(index, options = self.options.len(), "ignoring selection of absent option");
                false
            }
        }
    }

    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    /// Set a booking-form field's value. Unknown keys are ignored (the gate
    /// never fails loudly); returns whether a field was updated.
    pub fn set_field_value(&mut self, key: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|field| field.key == key) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Whether the book action is currently enabled.
    pub fn can_book(&self) -> bool {
        can_book(&self.fields, &self.selection)
    }

    /// Classify the displayed grid at the given unit.
    ///
    /// Uses the participants of every meeting in the request; with no
    /// availability snapshot applied (including candidate mode, where the
    /// service owns the free/busy data) unselected cells classify as busy,
    /// per the closed-world default.
    pub fn classify(&self, unit_minutes: u32) -> Vec<GridCell> {
        let empty = AvailabilityStore::default();
        let store = self.store.as_ref().unwrap_or(&empty);
        let participants: Vec<&String> = self
            .specs
            .iter()
            .flat_map(|spec| spec.participants.iter())
            .collect();
        classify_grid(
            self.window_start,
            self.window_end,
            unit_minutes,
            participants.iter().copied(),
            store,
            &self.selection,
        )
    }
}

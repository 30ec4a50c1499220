//! Display-title resolution for meeting slots.
//!
//! The hosting widget historically resolved titles through ambient
//! property inheritance (event data, then a widget property, then the editor
//! manifest). Here the chain is an explicit function of all three sources;
//! resolution is per sub-event, never global.

use crate::matcher::{MeetingSpec, SlotCombination};

/// Fallback when no source supplies a title.
pub const DEFAULT_EVENT_TITLE: &str = "Meeting";

/// Resolve one slot's display title.
///
/// Precedence, highest first: a title hydrated onto the event data itself,
/// then a title passed as a widget property, then a title from the editor
/// manifest, then [`DEFAULT_EVENT_TITLE`]. Empty strings count as absent.
pub fn resolve_title<'a>(
    hydrated: Option<&'a str>,
    widget: Option<&'a str>,
    manifest: Option<&'a str>,
) -> &'a str {
    [hydrated, widget, manifest]
        .into_iter()
        .flatten()
        .find(|title| !title.trim().is_empty())
        .unwrap_or(DEFAULT_EVENT_TITLE)
}

/// Resolve the title of every sub-event in a combination independently.
///
/// The hydrated source for a sub-event is its meeting spec's `event_title`;
/// an out-of-range meeting index (possible only with unvalidated candidate
/// data) falls through to the widget/manifest/default chain.
pub fn resolve_event_titles(
    combination: &SlotCombination,
    specs: &[MeetingSpec],
    widget: Option<&str>,
    manifest: Option<&str>,
) -> Vec<String> {
    combination
        .events
        .iter()
        .map(|event| {
            let hydrated = specs
                .get(event.meeting_index)
                .and_then(|spec| spec.event_title.as_deref());
            resolve_title(hydrated, widget, manifest).to_string()
        })
        .collect()
}

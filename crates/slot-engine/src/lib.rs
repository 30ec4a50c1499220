//! # slot-engine
//!
//! Consecutive-meeting slot matching for scheduling widgets.
//!
//! Given N meetings to be booked back-to-back — each with its own duration
//! and participant set — the engine computes every contiguous assignment of
//! time intervals where each meeting's participants are simultaneously free,
//! collapses assignments that differ only in which meeting occupies which
//! interval into a single bookable option, and tracks the selection and
//! booking-gate state those options feed.
//!
//! Availability is closed-world: a participant is busy at any instant not
//! covered by an explicit free interval.
//!
//! ## Modules
//!
//! - [`freebusy`] — raw intervals and the per-participant availability store
//! - [`matcher`] — grid discretization and consecutive combination search
//! - [`dedupe`] — equivalence classes of combinations → selectable options
//! - [`selection`] — selection state and free/busy/selected grid cells
//! - [`session`] — lifecycle glue: edits, fetch supersession, stale discard
//! - [`gate`] — required custom fields gating the book action
//! - [`title`] — display-title precedence chain
//! - [`error`] — error types

pub mod dedupe;
pub mod error;
pub mod freebusy;
pub mod gate;
pub mod matcher;
pub mod selection;
pub mod session;
pub mod title;

pub use dedupe::{dedupe, SelectableOption};
pub use error::SlotError;
pub use freebusy::{AvailabilityStore, FreeBusyInterval, FreeBusyStatus};
pub use gate::{can_book, default_fields, CustomField};
pub use matcher::{match_consecutive, validate_candidates, MeetingSpec, SlotCombination, SlotEvent};
pub use selection::{classify_grid, GridCell, SelectionState, SlotClass};
pub use session::{FetchToken, SchedulerSession};
pub use title::{resolve_event_titles, resolve_title, DEFAULT_EVENT_TITLE};

//! Error types for slot-engine operations.

use thiserror::Error;

/// Errors that can occur while matching, validating, or refreshing slots.
#[derive(Error, Debug)]
pub enum SlotError {
    /// The consecutive request contained no meetings at all.
    #[error("consecutive request has no meetings")]
    EmptyRequest,

    /// A MeetingSpec failed validation before the matching pass started.
    /// Includes the 0-based index of the offending meeting.
    #[error("invalid meeting at index {index}: {reason}")]
    InvalidMeeting { index: usize, reason: String },

    /// A pre-grouped candidate combination from the availability service
    /// failed structural validation. Includes the 0-based candidate index.
    #[error("invalid candidate combination at index {index}: {reason}")]
    InvalidCandidate { index: usize, reason: String },

    /// The availability fetch failed. The previous option list is left
    /// untouched; the caller may retry.
    #[error("availability fetch failed: {message}")]
    FetchFailed { message: String },
}

impl SlotError {
    /// Whether the operation that produced this error can be retried
    /// without changing its inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SlotError::FetchFailed { .. })
    }
}

/// Convenience alias used throughout slot-engine.
pub type Result<T> = std::result::Result<T, SlotError>;

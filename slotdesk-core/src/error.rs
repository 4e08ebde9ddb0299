//! Error types for slotdesk.

use thiserror::Error;

/// Errors that can occur in slotdesk operations.
#[derive(Error, Debug)]
pub enum SlotDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected MM/DD/YYYY or YYYY-MM-DD")]
    InvalidDayKey(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("{0} does not exist in the booking time zone")]
    NonexistentLocalTime(String),

    #[error("Specify time for all dates")]
    MissingTimes,

    #[error("Select at least one date before adding batch times")]
    EmptyBatchSelection,

    #[error("Open the batch time editor first")]
    BatchTimeEditorClosed,

    #[error("Batch mode is not active")]
    BatchModeInactive,

    #[error("Not available while batch mode is active")]
    BatchModeActive,

    #[error("No batch time at position {0}")]
    NoSuchBatchTime(usize),

    #[error("{0} has booked slots and cannot be changed")]
    DayLocked(String),

    #[error("Draft error: {0}")]
    Draft(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SlotDeskError {
    /// Validation failures are shown to the operator as a blocking message
    /// and never change state. Everything else is an environment problem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SlotDeskError::InvalidDayKey(_)
                | SlotDeskError::InvalidTimestamp(_)
                | SlotDeskError::InvalidTime(_)
                | SlotDeskError::NonexistentLocalTime(_)
                | SlotDeskError::MissingTimes
                | SlotDeskError::EmptyBatchSelection
                | SlotDeskError::BatchTimeEditorClosed
                | SlotDeskError::BatchModeInactive
                | SlotDeskError::BatchModeActive
                | SlotDeskError::NoSuchBatchTime(_)
                | SlotDeskError::DayLocked(_)
        )
    }
}

/// Result type alias for slotdesk operations.
pub type SlotDeskResult<T> = Result<T, SlotDeskError>;

//! # History Errors
//!
//! Error types for timeline reconstruction.

use thiserror::Error;

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Reconstruction failures
///
/// None of these are retried. The caller reports them and stops stepping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Record detail is not a structured diff
    #[error("Detail of record {sequence} is not a valid diff: {reason}")]
    Parse { sequence: u64, reason: String },

    /// No records exist for the resource
    #[error("Resource has no timeline")]
    EmptyTimeline,

    /// Requested step lies beyond the loaded records
    #[error("Step {step} is out of range (timeline has {len} records)")]
    StepOutOfRange { step: usize, len: usize },
}

impl HistoryError {
    /// Build a parse error for the record at `sequence`
    pub fn parse(sequence: u64, reason: impl Into<String>) -> Self {
        HistoryError::Parse {
            sequence,
            reason: reason.into(),
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            HistoryError::Parse { .. } => "CMS_HISTORY_PARSE",
            HistoryError::EmptyTimeline => "CMS_HISTORY_EMPTY_TIMELINE",
            HistoryError::StepOutOfRange { .. } => "CMS_HISTORY_STEP_OUT_OF_RANGE",
        }
    }
}

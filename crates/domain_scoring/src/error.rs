//! Decision pipeline errors

use core_kernel::PortError;
use thiserror::Error;

/// Reasons a claim is refused before the pipeline runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),

    #[error("history_score must be within [0, 100], got {0}")]
    HistoryScoreOutOfRange(f64),
}

/// Errors surfaced by the decision recorder
///
/// A run either yields a complete decision or exactly one of these.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid claim: {0}")]
    InvalidClaim(#[from] ClaimValidationError),

    #[error("Scoring failed: {source}")]
    ScoringFailed {
        #[source]
        source: PortError,
    },
}

impl ScoringError {
    pub fn failed(source: PortError) -> Self {
        ScoringError::ScoringFailed { source }
    }
}

// =============================================================================
// Error taxonomy
// =============================================================================
//
// Collaborator-level problems terminate a single instrument's task and surface
// as an `AnalysisFailure`.  Computation-level problems (short history, zero
// ranges) never appear here: they are absorbed as indicator `Availability`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violations detected while building a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} is dated {date}, not after the previous bar")]
    OutOfOrder { index: usize, date: chrono::NaiveDate },

    #[error("bar {index} has a non-finite or negative price")]
    InvalidPrice { index: usize },

    #[error("bar {index} violates high >= max(open, close) / low <= min(open, close)")]
    InconsistentRange { index: usize },
}

/// Errors returned by the price and headline collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("no data available")]
    NoData,

    #[error("transient source error: {0}")]
    Transient(String),
}

/// Machine-readable failure tag carried by every `AnalysisFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    NoData,
    Timeout,
    TransientError,
    InvalidInput,
    /// The task panicked or was aborted before producing an outcome.
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::NoData => "NO_DATA",
            Self::Timeout => "TIMEOUT",
            Self::TransientError => "TRANSIENT_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal => "INTERNAL",
        };
        f.write_str(tag)
    }
}

/// Per-instrument failure value returned in place of an `AnalysisResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{instrument_id}: {kind} ({reason})")]
pub struct AnalysisFailure {
    pub instrument_id: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl AnalysisFailure {
    pub fn new(instrument_id: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Map a collaborator error onto the failure taxonomy.
    pub fn from_source(instrument_id: impl Into<String>, err: SourceError) -> Self {
        let kind = match err {
            SourceError::NoData => FailureKind::NoData,
            SourceError::Transient(_) => FailureKind::TransientError,
        };
        Self::new(instrument_id, kind, err.to_string())
    }
}

// =============================================================================
// Analysis results — per-instrument record and the batch report
// =============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AnalysisFailure, FailureKind};
use crate::indicators::IndicatorSnapshot;
use crate::sentiment::SentimentSummary;
use crate::signals::SignalSet;
use crate::types::{InstrumentClass, Recommendation};

/// Everything computed for one instrument.  Owned exclusively by the task
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Normalised (trimmed, uppercased) identifier.
    pub instrument_id: String,
    pub class: InstrumentClass,
    pub latest_price: f64,
    /// Date of the final bar.
    pub as_of: NaiveDate,
    pub indicators: IndicatorSnapshot,
    pub signals: SignalSet,
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub bullish_count: usize,
    pub bearish_count: usize,
    /// Present only for equities analysed with sentiment enabled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sentiment: Option<SentimentSummary>,
}

pub type InstrumentOutcome = Result<AnalysisResult, AnalysisFailure>;

/// One submitted instrument and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// The identifier exactly as the caller submitted it.
    pub instrument_id: String,
    pub outcome: InstrumentOutcome,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Complete outcome set of one batch run, one entry per submitted instrument
/// in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &AnalysisFailure> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().err())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Failures of one kind.
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &AnalysisFailure> {
        self.failures().filter(move |f| f.kind == kind)
    }

    /// Successful results whose label contains BUY.
    pub fn buy_candidates(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.successes().filter(|r| r.recommendation.is_buy())
    }

    /// Successful results whose label contains SELL.
    pub fn sell_candidates(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.successes().filter(|r| r.recommendation.is_sell())
    }

    /// Entry for a submitted id (exact match on the caller's spelling).
    pub fn get(&self, instrument_id: &str) -> Option<&BatchEntry> {
        self.entries.iter().find(|e| e.instrument_id == instrument_id)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

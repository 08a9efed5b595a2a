// =============================================================================
// Recommendation Module — signal set -> label + confidence
// =============================================================================
//
// Two independent policies, selected by instrument class:
// - `EquityPolicy`    — bullish/bearish signal counts plus optional sentiment
// - `CommodityPolicy` — RSI/MACD confirmation and 30-day return, no sentiment
//
// Both are pure: identical inputs always produce identical verdicts.

pub mod commodity;
pub mod equity;

use serde::{Deserialize, Serialize};

pub use commodity::{CommodityPolicy, CommodityThresholds};
pub use equity::EquityPolicy;

use crate::indicators::IndicatorSnapshot;
use crate::signals::SignalSet;
use crate::types::{InstrumentClass, Recommendation};

const CONFIDENCE_PER_SIGNAL: usize = 15;
const CONFIDENCE_CAP: usize = 100;
const NEUTRAL_CONFIDENCE: u8 = 50;

/// Everything a policy may look at.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub signals: &'a SignalSet,
    pub snapshot: &'a IndicatorSnapshot,
    /// Average headline polarity in [-1, 1]; `None` when not requested.
    pub sentiment: Option<f64>,
}

/// The aggregated decision for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub recommendation: Recommendation,
    /// Heuristic strength in [0, 100]; not a probability.
    pub confidence: u8,
    pub bullish_count: usize,
    pub bearish_count: usize,
}

pub trait RecommendationPolicy: Send + Sync {
    fn name(&self) -> &'static str;
    fn recommend(&self, input: &PolicyInput<'_>) -> Verdict;
}

/// `min(100, max(bullish, bearish) * 15)`, or 50 when no signal fired at all.
pub fn confidence(signals: &SignalSet) -> u8 {
    if signals.is_empty() {
        return NEUTRAL_CONFIDENCE;
    }
    let strongest = signals.bullish_count().max(signals.bearish_count());
    let score = strongest.saturating_mul(CONFIDENCE_PER_SIGNAL).min(CONFIDENCE_CAP);
    // score <= 100, so the cast is lossless.
    score as u8
}

/// The policy that applies to instruments of `class`.
pub fn policy_for(class: InstrumentClass, commodity: &CommodityThresholds) -> Box<dyn RecommendationPolicy> {
    match class {
        InstrumentClass::Equity => Box::new(EquityPolicy),
        InstrumentClass::Commodity => Box::new(CommodityPolicy::new(*commodity)),
    }
}

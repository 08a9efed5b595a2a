// =============================================================================
// Price Series — immutable daily OHLCV history for one instrument
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    fn prices_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }

    fn range_consistent(&self) -> bool {
        self.high >= self.open.max(self.close).max(self.low)
            && self.low <= self.open.min(self.close).min(self.high)
    }
}

/// Bars strictly ascending by date.  Empty is valid and means "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap `bars`.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.prices_valid() {
                return Err(SeriesError::InvalidPrice { index });
            }
            if !bar.range_consistent() {
                return Err(SeriesError::InconsistentRange { index });
            }
            if index > 0 && bars[index - 1].date >= bar.date {
                return Err(SeriesError::OutOfOrder {
                    index,
                    date: bar.date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// The most recent `count` bars (the whole series when shorter).
    pub fn tail(&self, count: usize) -> PriceSeries {
        let start = self.bars.len().saturating_sub(count);
        PriceSeries {
            bars: self.bars[start..].to_vec(),
        }
    }
}

// Wire form is the bare bar array, validated again on the way in.
impl Serialize for PriceSeries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bars.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bars = Vec::<PriceBar>::deserialize(deserializer)?;
        PriceSeries::new(bars).map_err(serde::de::Error::custom)
    }
}

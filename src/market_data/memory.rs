use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{PriceDataSource, PriceSeries};
use crate::error::SourceError;

// ---------------------------------------------------------------------------
// InMemoryPriceSource -- thread-safe map of preloaded series
// ---------------------------------------------------------------------------

/// Preloaded series keyed by instrument id.  Fetches hand out an owned copy of
/// the trailing `lookback` bars so no series is shared between analyses.
#[derive(Default)]
pub struct InMemoryPriceSource {
    series: RwLock<HashMap<String, PriceSeries>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series for `instrument_id`.  Keys are stored
    /// trimmed and uppercased, the form the pipeline fetches with.
    pub fn insert(&self, instrument_id: impl Into<String>, series: PriceSeries) {
        self.series.write().insert(key(&instrument_id.into()), series);
    }

    pub fn with_series(self, instrument_id: impl Into<String>, series: PriceSeries) -> Self {
        self.insert(instrument_id, series);
        self
    }

    pub fn contains(&self, instrument_id: &str) -> bool {
        self.series.read().contains_key(&key(instrument_id))
    }
}

fn key(instrument_id: &str) -> String {
    instrument_id.trim().to_ascii_uppercase()
}

#[async_trait]
impl PriceDataSource for InMemoryPriceSource {
    async fn fetch(&self, instrument_id: &str, lookback: usize) -> Result<PriceSeries, SourceError> {
        let map = self.series.read();
        match map.get(&key(instrument_id)) {
            Some(series) => Ok(series.tail(lookback)),
            None => Err(SourceError::NoData),
        }
    }
}

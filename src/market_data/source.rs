// =============================================================================
// Price data collaborator
// =============================================================================

use async_trait::async_trait;

use super::PriceSeries;
use crate::error::SourceError;

/// Abstract provider of daily bars.
///
/// `lookback` is the number of trailing trading days the caller needs.
/// Implementations return `SourceError::NoData` for unknown instruments and
/// may return an empty series, which the pipeline also treats as no data.
/// Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait PriceDataSource: Send + Sync {
    async fn fetch(&self, instrument_id: &str, lookback: usize) -> Result<PriceSeries, SourceError>;
}

// =============================================================================
// quant-scan — technical indicator scanner for equities and commodities
// =============================================================================
//
// Price bars flow one way:
//
//   PriceSeries -> IndicatorFrame -> SignalSet -> Verdict -> AnalysisResult
//
// Data and headlines come from caller-supplied collaborators
// (`PriceDataSource`, `SentimentSource`); the library installs no tracing
// subscriber and performs no I/O of its own beyond config files.

pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod recommendation;
pub mod sentiment;
pub mod signals;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{AnalysisFailure, FailureKind, SeriesError, SourceError};
pub use indicators::{Availability, IndicatorFrame, IndicatorKind, IndicatorParams, IndicatorSnapshot};
pub use market_data::{InMemoryPriceSource, PriceBar, PriceDataSource, PriceSeries};
pub use pipeline::{AnalysisResult, Analyzer, BatchEntry, BatchReport, InstrumentOutcome};
pub use recommendation::{CommodityThresholds, RecommendationPolicy, Verdict};
pub use sentiment::{SentimentSource, SentimentSummary, StaticSentimentSource};
pub use signals::{Signal, SignalSet};
pub use types::{Instrument, InstrumentClass, Recommendation};

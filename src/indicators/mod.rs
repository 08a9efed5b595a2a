// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// scanner.  Every series function returns a `Vec<Option<f64>>` aligned 1:1
// with its input so callers are forced to handle insufficient-data and
// zero-denominator positions explicitly.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volatility;
pub mod volume;
pub mod williams;
pub mod window;

pub use frame::{Availability, IndicatorFrame, IndicatorKind, IndicatorParams, IndicatorSeries, IndicatorSnapshot};

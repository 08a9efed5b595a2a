// =============================================================================
// Signal Deriver — latest indicator values -> discrete signals
// =============================================================================
//
// | Indicator            | Condition                         | Signal              |
// |----------------------|-----------------------------------|---------------------|
// | RSI                  | < 30 / > 70                       | RSI_OVERSOLD / _OVERBOUGHT |
// | MACD vs signal, hist | MACD > signal && hist > 0 (and <) | MACD_BULLISH / _BEARISH    |
// | Price vs Bollinger   | > upper / < lower                 | BB_OVERBOUGHT / _OVERSOLD  |
// | Stochastic %K & %D   | both < 20 / both > 80             | STOCH_OVERSOLD / _OVERBOUGHT |
// | Williams %R          | < -80 / > -20                     | WILLIAMS_OVERSOLD / _OVERBOUGHT |
// | Price, SMA short/long| p > s > l / p < s < l             | MA_BULLISH_TREND / _BEARISH_TREND |
// | Volume ratio         | > 1.5 / < 0.5                     | VOLUME_HIGH / _LOW         |
//
// All comparisons are strict.  An absent indicator contributes nothing.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::signal::{Signal, SignalSet};
use crate::indicators::IndicatorSnapshot;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;
const WILLIAMS_OVERSOLD: f64 = -80.0;
const WILLIAMS_OVERBOUGHT: f64 = -20.0;
const VOLUME_HIGH: f64 = 1.5;
const VOLUME_LOW: f64 = 0.5;

/// Volatility bands (percent) for the commodity context signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextThresholds {
    pub volatility_high_pct: f64,
    pub volatility_low_pct: f64,
}

impl Default for ContextThresholds {
    fn default() -> Self {
        Self {
            volatility_high_pct: 3.0,
            volatility_low_pct: 1.0,
        }
    }
}

/// Stateless mapping from a snapshot to a signal set.
#[derive(Debug, Clone, Default)]
pub struct SignalDeriver {
    context: Option<ContextThresholds>,
}

impl SignalDeriver {
    /// Deriver for the threshold table only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit price-vs-SMA and volatility context signals.
    pub fn with_context(thresholds: ContextThresholds) -> Self {
        Self {
            context: Some(thresholds),
        }
    }

    pub fn derive(&self, price: f64, snap: &IndicatorSnapshot) -> SignalSet {
        let mut signals = SignalSet::new();

        if let Some(rsi) = snap.rsi {
            if rsi < RSI_OVERSOLD {
                signals.insert(Signal::RsiOversold);
            }
            if rsi > RSI_OVERBOUGHT {
                signals.insert(Signal::RsiOverbought);
            }
        }

        if let (Some(macd), Some(signal), Some(hist)) = (snap.macd, snap.macd_signal, snap.macd_histogram) {
            if macd > signal && hist > 0.0 {
                signals.insert(Signal::MacdBullish);
            }
            if macd < signal && hist < 0.0 {
                signals.insert(Signal::MacdBearish);
            }
        }

        if let Some(upper) = snap.bb_upper {
            if price > upper {
                signals.insert(Signal::BbOverbought);
            }
        }
        if let Some(lower) = snap.bb_lower {
            if price < lower {
                signals.insert(Signal::BbOversold);
            }
        }

        if let (Some(k), Some(d)) = (snap.stoch_k, snap.stoch_d) {
            if k < STOCH_OVERSOLD && d < STOCH_OVERSOLD {
                signals.insert(Signal::StochOversold);
            }
            if k > STOCH_OVERBOUGHT && d > STOCH_OVERBOUGHT {
                signals.insert(Signal::StochOverbought);
            }
        }

        if let Some(w) = snap.williams_r {
            if w < WILLIAMS_OVERSOLD {
                signals.insert(Signal::WilliamsOversold);
            }
            if w > WILLIAMS_OVERBOUGHT {
                signals.insert(Signal::WilliamsOverbought);
            }
        }

        if let (Some(short), Some(long)) = (snap.sma_short, snap.sma_long) {
            if price > short && short > long {
                signals.insert(Signal::MaBullishTrend);
            }
            if price < short && short < long {
                signals.insert(Signal::MaBearishTrend);
            }
        }

        if let Some(ratio) = snap.volume_ratio {
            if ratio > VOLUME_HIGH {
                signals.insert(Signal::VolumeHigh);
            }
            if ratio < VOLUME_LOW {
                signals.insert(Signal::VolumeLow);
            }
        }

        if let Some(ctx) = &self.context {
            if let Some(short) = snap.sma_short {
                if price > short {
                    signals.insert(Signal::PriceAboveSma);
                }
                if price < short {
                    signals.insert(Signal::PriceBelowSma);
                }
            }
            if let Some(vol) = snap.volatility {
                if vol > ctx.volatility_high_pct {
                    signals.insert(Signal::VolatilityHigh);
                }
                if vol < ctx.volatility_low_pct {
                    signals.insert(Signal::VolatilityLow);
                }
            }
        }

        signals
    }
}

// =============================================================================
// Commodity Policy — momentum confirmation and 30-day return
// =============================================================================
//
// Evaluated in order, first match wins:
//   1. RSI < 35 and MACD_BULLISH                        => BUY
//   2. RSI > 65 and MACD_BEARISH                        => SELL
//   3. N-day return > +10% and no *_OVERSOLD signal     => HOLD/TAKE_PROFITS
//   4. N-day return < -10%                              => ACCUMULATE
//   5. otherwise                                        => HOLD
//
// Sentiment is ignored.  An absent RSI or return skips the rules that need it.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{confidence, PolicyInput, RecommendationPolicy, Verdict};
use crate::signals::{ContextThresholds, Signal};
use crate::types::Recommendation;

fn default_rsi_buy_below() -> f64 {
    35.0
}
fn default_rsi_sell_above() -> f64 {
    65.0
}
fn default_strong_return_pct() -> f64 {
    10.0
}
fn default_volatility_high_pct() -> f64 {
    3.0
}
fn default_volatility_low_pct() -> f64 {
    1.0
}

/// Tunable thresholds for commodity-class instruments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommodityThresholds {
    #[serde(default = "default_rsi_buy_below")]
    pub rsi_buy_below: f64,
    #[serde(default = "default_rsi_sell_above")]
    pub rsi_sell_above: f64,
    /// Absolute N-day return (percent) that counts as a strong move.
    #[serde(default = "default_strong_return_pct")]
    pub strong_return_pct: f64,
    #[serde(default = "default_volatility_high_pct")]
    pub volatility_high_pct: f64,
    #[serde(default = "default_volatility_low_pct")]
    pub volatility_low_pct: f64,
}

impl Default for CommodityThresholds {
    fn default() -> Self {
        Self {
            rsi_buy_below: default_rsi_buy_below(),
            rsi_sell_above: default_rsi_sell_above(),
            strong_return_pct: default_strong_return_pct(),
            volatility_high_pct: default_volatility_high_pct(),
            volatility_low_pct: default_volatility_low_pct(),
        }
    }
}

impl CommodityThresholds {
    pub fn context(&self) -> ContextThresholds {
        ContextThresholds {
            volatility_high_pct: self.volatility_high_pct,
            volatility_low_pct: self.volatility_low_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommodityPolicy {
    thresholds: CommodityThresholds,
}

impl CommodityPolicy {
    pub fn new(thresholds: CommodityThresholds) -> Self {
        Self { thresholds }
    }
}

impl RecommendationPolicy for CommodityPolicy {
    fn name(&self) -> &'static str {
        "commodity"
    }

    fn recommend(&self, input: &PolicyInput<'_>) -> Verdict {
        let t = &self.thresholds;
        let signals = input.signals;
        let rsi = input.snapshot.rsi;
        let ret = input.snapshot.n_day_return;

        let recommendation = if rsi.is_some_and(|r| r < t.rsi_buy_below) && signals.contains(Signal::MacdBullish) {
            Recommendation::Buy
        } else if rsi.is_some_and(|r| r > t.rsi_sell_above) && signals.contains(Signal::MacdBearish) {
            Recommendation::Sell
        } else if ret.is_some_and(|r| r > t.strong_return_pct) && !signals.any_oversold() {
            Recommendation::TakeProfits
        } else if ret.is_some_and(|r| r < -t.strong_return_pct) {
            Recommendation::Accumulate
        } else {
            Recommendation::Hold
        };

        Verdict {
            recommendation,
            confidence: confidence(signals),
            bullish_count: signals.bullish_count(),
            bearish_count: signals.bearish_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorSnapshot;
    use crate::signals::SignalSet;

    fn verdict(signals: &[Signal], rsi: Option<f64>, ret: Option<f64>) -> Recommendation {
        let set: SignalSet = signals.iter().copied().collect();
        let snap = IndicatorSnapshot {
            rsi,
            n_day_return: ret,
            ..IndicatorSnapshot::default()
        };
        CommodityPolicy::default()
            .recommend(&PolicyInput {
                signals: &set,
                snapshot: &snap,
                sentiment: None,
            })
            .recommendation
    }

    #[test]
    fn oversold_bounce_is_buy() {
        assert_eq!(verdict(&[Signal::MacdBullish], Some(33.0), Some(-15.0)), Recommendation::Buy);
    }

    #[test]
    fn overbought_turn_is_sell() {
        assert_eq!(verdict(&[Signal::MacdBearish], Some(68.0), Some(12.0)), Recommendation::Sell);
    }

    #[test]
    fn rsi_without_macd_confirmation_falls_through() {
        assert_eq!(verdict(&[], Some(20.0), Some(0.0)), Recommendation::Hold);
        assert_eq!(verdict(&[Signal::MacdBearish], Some(20.0), None), Recommendation::Hold);
    }

    #[test]
    fn strong_gain_takes_profits_unless_oversold() {
        assert_eq!(verdict(&[], Some(60.0), Some(12.5)), Recommendation::TakeProfits);
        assert_eq!(
            verdict(&[Signal::WilliamsOversold], Some(60.0), Some(12.5)),
            Recommendation::Hold
        );
    }

    #[test]
    fn strong_drop_accumulates() {
        assert_eq!(verdict(&[Signal::MacdBearish], Some(45.0), Some(-11.0)), Recommendation::Accumulate);
    }

    #[test]
    fn return_thresholds_are_strict() {
        assert_eq!(verdict(&[], Some(50.0), Some(10.0)), Recommendation::Hold);
        assert_eq!(verdict(&[], Some(50.0), Some(-10.0)), Recommendation::Hold);
    }

    #[test]
    fn absent_rsi_and_return_hold() {
        assert_eq!(verdict(&[Signal::MacdBullish], None, None), Recommendation::Hold);
    }

    #[test]
    fn sentiment_is_ignored() {
        let set: SignalSet = [Signal::MacdBullish].into_iter().collect();
        let snap = IndicatorSnapshot {
            rsi: Some(30.0),
            ..IndicatorSnapshot::default()
        };
        let policy = CommodityPolicy::default();
        let a = policy.recommend(&PolicyInput {
            signals: &set,
            snapshot: &snap,
            sentiment: Some(-1.0),
        });
        let b = policy.recommend(&PolicyInput {
            signals: &set,
            snapshot: &snap,
            sentiment: None,
        });
        assert_eq!(a, b);
        assert_eq!(a.recommendation, Recommendation::Buy);
    }
}

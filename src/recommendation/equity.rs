// =============================================================================
// Equity Policy — signal-count majority gated by sentiment
// =============================================================================
//
// Evaluated in order, first match wins:
//   1. bullish > bearish and sentiment >= 0 (or absent)  => BUY
//      escalated to STRONG_BUY when bullish - bearish >= 2 and sentiment > 0
//   2. bearish > bullish and sentiment <= 0 (or absent)  => SELL
//      escalated to STRONG_SELL when bearish - bullish >= 2 and sentiment < 0
//   3. otherwise                                          => HOLD
//
// Escalation needs a sentiment reading, so it only happens when sentiment was
// requested for the analysis.
// =============================================================================

use super::{confidence, PolicyInput, RecommendationPolicy, Verdict};
use crate::types::Recommendation;

const ESCALATION_MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct EquityPolicy;

impl RecommendationPolicy for EquityPolicy {
    fn name(&self) -> &'static str {
        "equity"
    }

    fn recommend(&self, input: &PolicyInput<'_>) -> Verdict {
        let bullish = input.signals.bullish_count();
        let bearish = input.signals.bearish_count();
        let sentiment = input.sentiment;

        let recommendation = if bullish > bearish && sentiment.map_or(true, |s| s >= 0.0) {
            let strong = bullish - bearish >= ESCALATION_MARGIN && sentiment.is_some_and(|s| s > 0.0);
            if strong {
                Recommendation::StrongBuy
            } else {
                Recommendation::Buy
            }
        } else if bearish > bullish && sentiment.map_or(true, |s| s <= 0.0) {
            let strong = bearish - bullish >= ESCALATION_MARGIN && sentiment.is_some_and(|s| s < 0.0);
            if strong {
                Recommendation::StrongSell
            } else {
                Recommendation::Sell
            }
        } else {
            Recommendation::Hold
        };

        Verdict {
            recommendation,
            confidence: confidence(input.signals),
            bullish_count: bullish,
            bearish_count: bearish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorSnapshot;
    use crate::signals::{Signal, SignalSet};

    fn verdict(signals: &[Signal], sentiment: Option<f64>) -> Verdict {
        let set: SignalSet = signals.iter().copied().collect();
        let snap = IndicatorSnapshot::default();
        EquityPolicy.recommend(&PolicyInput {
            signals: &set,
            snapshot: &snap,
            sentiment,
        })
    }

    #[test]
    fn no_signals_hold_fifty() {
        let v = verdict(&[], None);
        assert_eq!(v.recommendation, Recommendation::Hold);
        assert_eq!(v.confidence, 50);
    }

    #[test]
    fn bullish_majority_without_sentiment_is_buy() {
        let v = verdict(&[Signal::RsiOversold, Signal::MacdBullish, Signal::BbOversold], None);
        assert_eq!(v.recommendation, Recommendation::Buy);
        assert_eq!(v.bullish_count, 3);
        assert_eq!(v.confidence, 45);
    }

    #[test]
    fn bullish_majority_with_positive_sentiment_escalates() {
        let v = verdict(&[Signal::RsiOversold, Signal::MacdBullish], Some(0.2));
        assert_eq!(v.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn margin_of_one_does_not_escalate() {
        let v = verdict(&[Signal::RsiOversold, Signal::MacdBullish, Signal::BbOverbought], Some(0.9));
        assert_eq!(v.recommendation, Recommendation::Buy);
    }

    #[test]
    fn zero_sentiment_allows_buy_but_not_escalation() {
        let v = verdict(&[Signal::RsiOversold, Signal::MacdBullish], Some(0.0));
        assert_eq!(v.recommendation, Recommendation::Buy);
    }

    #[test]
    fn bullish_majority_with_negative_sentiment_holds() {
        let v = verdict(&[Signal::RsiOversold, Signal::MacdBullish], Some(-0.3));
        assert_eq!(v.recommendation, Recommendation::Hold);
        assert_eq!(v.confidence, 30);
    }

    #[test]
    fn bearish_side_mirrors() {
        assert_eq!(
            verdict(&[Signal::RsiOverbought], None).recommendation,
            Recommendation::Sell
        );
        assert_eq!(
            verdict(&[Signal::RsiOverbought, Signal::MacdBearish], Some(-0.1)).recommendation,
            Recommendation::StrongSell
        );
        assert_eq!(
            verdict(&[Signal::RsiOverbought, Signal::MacdBearish], Some(0.1)).recommendation,
            Recommendation::Hold
        );
    }

    #[test]
    fn tie_is_hold() {
        let v = verdict(&[Signal::RsiOversold, Signal::WilliamsOverbought], Some(0.5));
        assert_eq!(v.recommendation, Recommendation::Hold);
        assert_eq!(v.confidence, 15);
    }

    #[test]
    fn volume_signals_are_neutral() {
        let v = verdict(&[Signal::VolumeHigh, Signal::RsiOversold], None);
        assert_eq!(v.bullish_count, 1);
        assert_eq!(v.bearish_count, 0);
        assert_eq!(v.recommendation, Recommendation::Buy);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let signals = [Signal::StochOverbought, Signal::MaBearishTrend, Signal::VolumeLow];
        let first = verdict(&signals, Some(-0.05));
        for _ in 0..10 {
            assert_eq!(verdict(&signals, Some(-0.05)), first);
        }
    }
}

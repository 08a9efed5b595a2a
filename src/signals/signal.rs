// =============================================================================
// Discrete signals
// =============================================================================

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named threshold crossing.  Declaration order is the stable display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    RsiOversold,
    RsiOverbought,
    MacdBullish,
    MacdBearish,
    BbOverbought,
    BbOversold,
    StochOversold,
    StochOverbought,
    WilliamsOversold,
    WilliamsOverbought,
    MaBullishTrend,
    MaBearishTrend,
    VolumeHigh,
    VolumeLow,
    // Commodity context
    PriceAboveSma,
    PriceBelowSma,
    VolatilityHigh,
    VolatilityLow,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsiOversold => "RSI_OVERSOLD",
            Self::RsiOverbought => "RSI_OVERBOUGHT",
            Self::MacdBullish => "MACD_BULLISH",
            Self::MacdBearish => "MACD_BEARISH",
            Self::BbOverbought => "BB_OVERBOUGHT",
            Self::BbOversold => "BB_OVERSOLD",
            Self::StochOversold => "STOCH_OVERSOLD",
            Self::StochOverbought => "STOCH_OVERBOUGHT",
            Self::WilliamsOversold => "WILLIAMS_OVERSOLD",
            Self::WilliamsOverbought => "WILLIAMS_OVERBOUGHT",
            Self::MaBullishTrend => "MA_BULLISH_TREND",
            Self::MaBearishTrend => "MA_BEARISH_TREND",
            Self::VolumeHigh => "VOLUME_HIGH",
            Self::VolumeLow => "VOLUME_LOW",
            Self::PriceAboveSma => "PRICE_ABOVE_SMA",
            Self::PriceBelowSma => "PRICE_BELOW_SMA",
            Self::VolatilityHigh => "VOLATILITY_HIGH",
            Self::VolatilityLow => "VOLATILITY_LOW",
        }
    }

    /// Classification is by name: any tag containing `OVERSOLD` or `BULLISH`.
    pub fn is_bullish(&self) -> bool {
        let name = self.as_str();
        name.contains("OVERSOLD") || name.contains("BULLISH")
    }

    /// Any tag containing `OVERBOUGHT` or `BEARISH`.
    pub fn is_bearish(&self) -> bool {
        let name = self.as_str();
        name.contains("OVERBOUGHT") || name.contains("BEARISH")
    }

    pub fn is_oversold(&self) -> bool {
        self.as_str().contains("OVERSOLD")
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Duplicate-free signal set with a stable iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSet(BTreeSet<Signal>);

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal: Signal) -> bool {
        self.0.insert(signal)
    }

    pub fn contains(&self, signal: Signal) -> bool {
        self.0.contains(&signal)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        self.0.iter().copied()
    }

    pub fn bullish_count(&self) -> usize {
        self.iter().filter(Signal::is_bullish).count()
    }

    pub fn bearish_count(&self) -> usize {
        self.iter().filter(Signal::is_bearish).count()
    }

    pub fn any_oversold(&self) -> bool {
        self.iter().any(|s| s.is_oversold())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|s| s.as_str()).collect()
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

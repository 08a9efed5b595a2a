// =============================================================================
// Shared types used across the scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which recommendation policy (and lookback window) applies to an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentClass {
    Equity,
    Commodity,
}

impl Default for InstrumentClass {
    fn default() -> Self {
        Self::Equity
    }
}

impl std::fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equity => write!(f, "Equity"),
            Self::Commodity => write!(f, "Commodity"),
        }
    }
}

/// A caller-supplied (id, class) pair submitted to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    #[serde(default)]
    pub class: InstrumentClass,
}

impl Instrument {
    pub fn new(id: impl Into<String>, class: InstrumentClass) -> Self {
        Self {
            id: id.into(),
            class,
        }
    }

    pub fn equity(id: impl Into<String>) -> Self {
        Self::new(id, InstrumentClass::Equity)
    }

    pub fn commodity(id: impl Into<String>) -> Self {
        Self::new(id, InstrumentClass::Commodity)
    }
}

/// The single aggregated decision label for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG_BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "ACCUMULATE")]
    Accumulate,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "HOLD/TAKE_PROFITS")]
    TakeProfits,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG_SELL")]
    StrongSell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Accumulate => "ACCUMULATE",
            Self::Hold => "HOLD",
            Self::TakeProfits => "HOLD/TAKE_PROFITS",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }

    pub fn is_buy(&self) -> bool {
        self.as_str().contains("BUY")
    }

    pub fn is_sell(&self) -> bool {
        self.as_str().contains("SELL")
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Indicator Frame — every indicator for one price series
// =============================================================================
//
// `IndicatorFrame::compute` is the whole indicator engine: a pure function
// from a `PriceSeries` to one aligned series per `IndicatorKind`.  Nothing is
// mutated after construction.
//
// Each series keeps one slot per bar.  The "latest" value is the slot of the
// final bar; an undefined final slot is reported as absent, never as an
// earlier value or as zero.
// =============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bollinger::calculate_bollinger;
use super::ema::calculate_ema;
use super::macd::calculate_macd;
use super::roc::calculate_roc;
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use super::stochastic::calculate_stochastic;
use super::volatility::calculate_volatility;
use super::volume::calculate_volume_ratio;
use super::williams::calculate_williams_r;
use crate::market_data::PriceSeries;

// =============================================================================
// Parameters
// =============================================================================

fn default_rsi_period() -> usize {
    14
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}
fn default_bb_period() -> usize {
    20
}
fn default_bb_num_std() -> f64 {
    2.0
}
fn default_stoch_k() -> usize {
    14
}
fn default_stoch_d() -> usize {
    3
}
fn default_williams_period() -> usize {
    14
}
fn default_sma_short() -> usize {
    20
}
fn default_sma_long() -> usize {
    50
}
fn default_ema_fast() -> usize {
    12
}
fn default_ema_slow() -> usize {
    26
}
fn default_volume_window() -> usize {
    20
}
fn default_volatility_window() -> usize {
    20
}
fn default_return_days() -> usize {
    30
}

/// Periods and multipliers for every indicator in the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    #[serde(default = "default_bb_period")]
    pub bb_period: usize,
    #[serde(default = "default_bb_num_std")]
    pub bb_num_std: f64,
    #[serde(default = "default_stoch_k")]
    pub stoch_k_period: usize,
    #[serde(default = "default_stoch_d")]
    pub stoch_d_period: usize,
    #[serde(default = "default_williams_period")]
    pub williams_period: usize,
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,
    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,
    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,
    #[serde(default = "default_volume_window")]
    pub volume_window: usize,
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
    /// N for the N-day return.
    #[serde(default = "default_return_days")]
    pub return_days: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_period: default_bb_period(),
            bb_num_std: default_bb_num_std(),
            stoch_k_period: default_stoch_k(),
            stoch_d_period: default_stoch_d(),
            williams_period: default_williams_period(),
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            volume_window: default_volume_window(),
            volatility_window: default_volatility_window(),
            return_days: default_return_days(),
        }
    }
}

impl IndicatorParams {
    /// Minimum number of bars before `kind` can produce its first value.
    pub fn lookback(&self, kind: IndicatorKind) -> usize {
        use IndicatorKind::*;
        match kind {
            Rsi => self.rsi_period + 1,
            Macd | MacdSignal | MacdHistogram | EmaFast | EmaSlow => 1,
            BbUpper | BbMiddle | BbLower | BbPosition => self.bb_period,
            StochK => self.stoch_k_period,
            StochD => self.stoch_k_period + self.stoch_d_period.saturating_sub(1),
            WilliamsR => self.williams_period,
            SmaShort => self.sma_short,
            SmaLong => self.sma_long,
            VolumeRatio => self.volume_window,
            Volatility => self.volatility_window + 1,
            NDayReturn => self.return_days + 1,
        }
    }

    /// Longest lookback across the whole frame.
    pub fn max_lookback(&self) -> usize {
        IndicatorKind::ALL
            .iter()
            .map(|&k| self.lookback(k))
            .max()
            .unwrap_or(1)
    }

    /// Names of any zero-valued period, which would make an indicator
    /// permanently undefined.
    pub fn zero_periods(&self) -> Vec<&'static str> {
        let checks = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bb_period", self.bb_period),
            ("stoch_k_period", self.stoch_k_period),
            ("stoch_d_period", self.stoch_d_period),
            ("williams_period", self.williams_period),
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("volume_window", self.volume_window),
            ("volatility_window", self.volatility_window),
            ("return_days", self.return_days),
        ];
        checks
            .into_iter()
            .filter(|(_, v)| *v == 0)
            .map(|(name, _)| name)
            .collect()
    }
}

// =============================================================================
// Kinds & availability
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MacdSignal,
    MacdHistogram,
    BbUpper,
    BbMiddle,
    BbLower,
    BbPosition,
    StochK,
    StochD,
    WilliamsR,
    SmaShort,
    SmaLong,
    EmaFast,
    EmaSlow,
    VolumeRatio,
    Volatility,
    NDayReturn,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 18] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::MacdSignal,
        IndicatorKind::MacdHistogram,
        IndicatorKind::BbUpper,
        IndicatorKind::BbMiddle,
        IndicatorKind::BbLower,
        IndicatorKind::BbPosition,
        IndicatorKind::StochK,
        IndicatorKind::StochD,
        IndicatorKind::WilliamsR,
        IndicatorKind::SmaShort,
        IndicatorKind::SmaLong,
        IndicatorKind::EmaFast,
        IndicatorKind::EmaSlow,
        IndicatorKind::VolumeRatio,
        IndicatorKind::Volatility,
        IndicatorKind::NDayReturn,
    ];
}

/// Why an indicator does or does not have a latest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Defined,
    /// Fewer bars than the indicator's lookback.
    InsufficientHistory,
    /// Enough bars, but the final value is undefined (zero range, 0 / 0).
    UndefinedValue,
}

// =============================================================================
// Series & frame
// =============================================================================

/// One indicator's values, one slot per bar of the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
    lookback: usize,
}

impl IndicatorSeries {
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn availability(&self) -> Availability {
        if self.values.len() < self.lookback || self.values.is_empty() {
            Availability::InsufficientHistory
        } else if self.latest().is_some() {
            Availability::Defined
        } else {
            Availability::UndefinedValue
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    dates: Vec<NaiveDate>,
    latest_close: Option<f64>,
    series: BTreeMap<IndicatorKind, IndicatorSeries>,
}

impl IndicatorFrame {
    /// Run every indicator over `prices`.  An empty series yields a frame in
    /// which every indicator reports `InsufficientHistory`.
    pub fn compute(prices: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = prices.closes();
        let highs = prices.highs();
        let lows = prices.lows();
        let volumes = prices.volumes();

        let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
        let bb = calculate_bollinger(&closes, params.bb_period, params.bb_num_std);
        let stoch = calculate_stochastic(
            &highs,
            &lows,
            &closes,
            params.stoch_k_period,
            params.stoch_d_period,
        );

        let raw: Vec<(IndicatorKind, Vec<Option<f64>>)> = vec![
            (IndicatorKind::Rsi, calculate_rsi(&closes, params.rsi_period)),
            (IndicatorKind::Macd, macd.macd),
            (IndicatorKind::MacdSignal, macd.signal),
            (IndicatorKind::MacdHistogram, macd.histogram),
            (IndicatorKind::BbUpper, bb.upper),
            (IndicatorKind::BbMiddle, bb.middle),
            (IndicatorKind::BbLower, bb.lower),
            (IndicatorKind::BbPosition, bb.position),
            (IndicatorKind::StochK, stoch.k),
            (IndicatorKind::StochD, stoch.d),
            (
                IndicatorKind::WilliamsR,
                calculate_williams_r(&highs, &lows, &closes, params.williams_period),
            ),
            (IndicatorKind::SmaShort, calculate_sma(&closes, params.sma_short)),
            (IndicatorKind::SmaLong, calculate_sma(&closes, params.sma_long)),
            (IndicatorKind::EmaFast, calculate_ema(&closes, params.ema_fast)),
            (IndicatorKind::EmaSlow, calculate_ema(&closes, params.ema_slow)),
            (
                IndicatorKind::VolumeRatio,
                calculate_volume_ratio(&volumes, params.volume_window),
            ),
            (
                IndicatorKind::Volatility,
                calculate_volatility(&closes, params.volatility_window),
            ),
            (IndicatorKind::NDayReturn, calculate_roc(&closes, params.return_days)),
        ];

        let series = raw
            .into_iter()
            .map(|(kind, mut values)| {
                values.resize(closes.len(), None);
                let lookback = params.lookback(kind);
                (kind, IndicatorSeries { values, lookback })
            })
            .collect();

        Self {
            dates: prices.dates(),
            latest_close: closes.last().copied(),
            series,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.latest_close
    }

    pub fn series(&self, kind: IndicatorKind) -> Option<&IndicatorSeries> {
        self.series.get(&kind)
    }

    pub fn latest(&self, kind: IndicatorKind) -> Option<f64> {
        self.series(kind).and_then(IndicatorSeries::latest)
    }

    pub fn availability(&self, kind: IndicatorKind) -> Availability {
        self.series(kind)
            .map(IndicatorSeries::availability)
            .unwrap_or(Availability::InsufficientHistory)
    }

    /// Defined (date, value) pairs for `kind`, oldest first.
    pub fn points(&self, kind: IndicatorKind) -> Vec<(NaiveDate, f64)> {
        let Some(series) = self.series(kind) else {
            return Vec::new();
        };
        self.dates
            .iter()
            .zip(series.values())
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
            .collect()
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.latest(IndicatorKind::Rsi),
            macd: self.latest(IndicatorKind::Macd),
            macd_signal: self.latest(IndicatorKind::MacdSignal),
            macd_histogram: self.latest(IndicatorKind::MacdHistogram),
            bb_upper: self.latest(IndicatorKind::BbUpper),
            bb_middle: self.latest(IndicatorKind::BbMiddle),
            bb_lower: self.latest(IndicatorKind::BbLower),
            bb_position: self.latest(IndicatorKind::BbPosition),
            stoch_k: self.latest(IndicatorKind::StochK),
            stoch_d: self.latest(IndicatorKind::StochD),
            williams_r: self.latest(IndicatorKind::WilliamsR),
            sma_short: self.latest(IndicatorKind::SmaShort),
            sma_long: self.latest(IndicatorKind::SmaLong),
            ema_fast: self.latest(IndicatorKind::EmaFast),
            ema_slow: self.latest(IndicatorKind::EmaSlow),
            volume_ratio: self.latest(IndicatorKind::VolumeRatio),
            volatility: self.latest(IndicatorKind::Volatility),
            n_day_return: self.latest(IndicatorKind::NDayReturn),
        }
    }
}

/// Latest value of every indicator; `None` means absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_position: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub williams_r: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub volatility: Option<f64>,
    pub n_day_return: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::bar::test_support::{series_from_closes, series_with_spread};

    #[test]
    fn empty_series_reports_insufficient_history_everywhere() {
        let frame = IndicatorFrame::compute(&PriceSeries::empty(), &IndicatorParams::default());
        assert!(frame.is_empty());
        assert!(frame.latest_close().is_none());
        for kind in IndicatorKind::ALL {
            assert_eq!(frame.availability(kind), Availability::InsufficientHistory, "{kind:?}");
            assert!(frame.latest(kind).is_none());
        }
    }

    #[test]
    fn short_series_never_fabricates_values() {
        let params = IndicatorParams::default();
        for len in [1usize, 5, 13, 19, 25, 49] {
            let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            let frame = IndicatorFrame::compute(&series_with_spread(&closes, 1.0), &params);
            for kind in IndicatorKind::ALL {
                if len < params.lookback(kind) {
                    assert!(frame.latest(kind).is_none(), "{kind:?} defined with {len} bars");
                    assert_eq!(frame.availability(kind), Availability::InsufficientHistory);
                }
            }
        }
    }

    #[test]
    fn sma_long_absent_below_fifty_bars() {
        let closes: Vec<f64> = (0..49).map(|i| 10.0 + i as f64).collect();
        let frame = IndicatorFrame::compute(&series_from_closes(&closes), &IndicatorParams::default());
        assert!(frame.latest(IndicatorKind::SmaLong).is_none());
        assert!(frame.latest(IndicatorKind::SmaShort).is_some());
    }

    #[test]
    fn flat_series_zero_ranges_are_undefined_values() {
        let frame = IndicatorFrame::compute(&series_from_closes(&[42.0; 30]), &IndicatorParams::default());
        assert_eq!(frame.availability(IndicatorKind::StochK), Availability::UndefinedValue);
        assert_eq!(frame.availability(IndicatorKind::WilliamsR), Availability::UndefinedValue);
        assert_eq!(frame.availability(IndicatorKind::Rsi), Availability::UndefinedValue);
        assert_eq!(frame.latest(IndicatorKind::BbUpper), Some(42.0));
        assert_eq!(frame.latest(IndicatorKind::BbLower), Some(42.0));
    }

    #[test]
    fn snapshot_matches_series_latest() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.3).sin() * 2.0).collect();
        let frame = IndicatorFrame::compute(&series_with_spread(&closes, 0.5), &IndicatorParams::default());
        let snap = frame.snapshot();
        assert_eq!(snap.rsi, frame.latest(IndicatorKind::Rsi));
        assert_eq!(snap.sma_long, frame.latest(IndicatorKind::SmaLong));
        assert!(snap.sma_long.is_some());
        assert!(snap.n_day_return.is_some());
    }

    #[test]
    fn points_are_a_suffix_of_dates() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let series = series_from_closes(&closes);
        let frame = IndicatorFrame::compute(&series, &IndicatorParams::default());
        let points = frame.points(IndicatorKind::SmaShort);
        assert_eq!(points.len(), 11);
        assert_eq!(points.first().unwrap().0, series.bars()[19].date);
        assert_eq!(points.last().unwrap().0, series.last().unwrap().date);
    }

    #[test]
    fn compute_is_deterministic() {
        let closes: Vec<f64> = (0..70).map(|i| 20.0 + (i as f64 * 0.7).cos()).collect();
        let series = series_with_spread(&closes, 0.2);
        let params = IndicatorParams::default();
        let a = IndicatorFrame::compute(&series, &params).snapshot();
        let b = IndicatorFrame::compute(&series, &params).snapshot();
        assert_eq!(a, b);
    }

    #[test]
    fn max_lookback_covers_sma_long_and_returns() {
        let params = IndicatorParams::default();
        assert_eq!(params.lookback(IndicatorKind::NDayReturn), 31);
        assert_eq!(params.max_lookback(), 50);
    }

    #[test]
    fn zero_periods_are_reported() {
        let params = IndicatorParams {
            rsi_period: 0,
            volume_window: 0,
            ..IndicatorParams::default()
        };
        assert_eq!(params.zero_periods(), vec!["rsi_period", "volume_window"]);
    }
}

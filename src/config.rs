// =============================================================================
// Analysis Configuration — pool size, timeouts, indicator periods
// =============================================================================
//
// Every tunable of the pipeline lives here.  All fields carry a serde default
// so that a partial JSON file (or `{}`) loads into a complete config.
//
// Persistence uses the tmp + rename pattern so a crash mid-write never leaves
// a truncated file behind.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::IndicatorParams;
use crate::recommendation::CommodityThresholds;
use crate::types::InstrumentClass;

pub const ENV_MAX_CONCURRENCY: &str = "QUANT_MAX_CONCURRENCY";
pub const ENV_FETCH_TIMEOUT_MS: &str = "QUANT_FETCH_TIMEOUT_MS";
pub const ENV_HEADLINE_LIMIT: &str = "QUANT_HEADLINE_LIMIT";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_max_concurrency() -> usize {
    8
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_headline_timeout_ms() -> u64 {
    10_000
}

fn default_headline_limit() -> usize {
    5
}

fn default_equity_lookback_bars() -> usize {
    60
}

fn default_commodity_lookback_bars() -> usize {
    90
}

// =============================================================================
// AnalysisConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // --- Worker pool -------------------------------------------------------

    /// Upper bound on instruments analysed at the same time.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    // --- Collaborator calls ------------------------------------------------

    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    #[serde(default = "default_headline_timeout_ms")]
    pub headline_timeout_ms: u64,

    /// Maximum headlines requested per instrument.
    #[serde(default = "default_headline_limit")]
    pub headline_limit: usize,

    /// Bars requested for equities.
    #[serde(default = "default_equity_lookback_bars")]
    pub equity_lookback_bars: usize,

    /// Bars requested for commodities (the 30-day return needs more room).
    #[serde(default = "default_commodity_lookback_bars")]
    pub commodity_lookback_bars: usize,

    /// When set, a failed or timed-out headline fetch yields neutral
    /// sentiment instead of failing the instrument.
    #[serde(default)]
    pub tolerate_headline_errors: bool,

    // --- Computation -------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub commodity: CommodityThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            headline_timeout_ms: default_headline_timeout_ms(),
            headline_limit: default_headline_limit(),
            equity_lookback_bars: default_equity_lookback_bars(),
            commodity_lookback_bars: default_commodity_lookback_bars(),
            tolerate_headline_errors: false,
            indicators: IndicatorParams::default(),
            commodity: CommodityThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            max_concurrency = config.max_concurrency,
            fetch_timeout_ms = config.fetch_timeout_ms,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` (write `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    /// Override selected fields from `QUANT_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// explicit lookup.  Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_MAX_CONCURRENCY) {
            self.max_concurrency = v;
        }
        if let Some(v) = parse_var::<u64, _>(&lookup, ENV_FETCH_TIMEOUT_MS) {
            self.fetch_timeout_ms = v;
        }
        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_HEADLINE_LIMIT) {
            self.headline_limit = v;
        }
    }

    /// Reject settings that would make the pipeline stall or every indicator
    /// permanently undefined.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be at least 1");
        }
        if self.fetch_timeout_ms == 0 || self.headline_timeout_ms == 0 {
            bail!("collaborator timeouts must be non-zero");
        }
        if self.equity_lookback_bars == 0 || self.commodity_lookback_bars == 0 {
            bail!("lookback bar counts must be non-zero");
        }
        let zero = self.indicators.zero_periods();
        if !zero.is_empty() {
            bail!("indicator periods must be non-zero: {}", zero.join(", "));
        }
        if !(self.indicators.bb_num_std.is_finite() && self.indicators.bb_num_std > 0.0) {
            bail!("bb_num_std must be a positive finite number");
        }
        Ok(())
    }

    /// Bars to request for an instrument of `class`: the configured count,
    /// raised to the longest indicator lookback so no indicator is starved.
    pub fn lookback_for(&self, class: InstrumentClass) -> usize {
        let configured = match class {
            InstrumentClass::Equity => self.equity_lookback_bars,
            InstrumentClass::Commodity => self.commodity_lookback_bars,
        };
        configured.max(self.indicators.max_lookback())
    }

    /// Worker count for a batch of `batch_len` instruments, never zero.
    pub fn pool_size(&self, batch_len: usize) -> usize {
        batch_len.min(self.max_concurrency).max(1)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn headline_timeout(&self) -> Duration {
        Duration::from_millis(self.headline_timeout_ms)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable config override");
            None
        }
    }
}

// =============================================================================
// Analyzer — one instrument, end to end
// =============================================================================
//
//   validate id -> fetch bars -> indicator frame -> signals
//               -> (equity + sentiment) headlines -> policy -> AnalysisResult
//
// The only awaits are the two collaborator calls, each bounded by its own
// timeout.  Everything after the fetch is synchronous and pure.
//
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::result::{AnalysisResult, InstrumentOutcome};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisFailure, FailureKind};
use crate::indicators::IndicatorFrame;
use crate::market_data::{PriceDataSource, PriceSeries};
use crate::recommendation::{policy_for, PolicyInput, RecommendationPolicy};
use crate::sentiment::{summarize, SentimentSource, SentimentSummary};
use crate::signals::SignalDeriver;
use crate::types::InstrumentClass;

const MAX_ID_LEN: usize = 12;

/// Trim and uppercase `raw`, then check it is 1-12 characters of ASCII
/// alphanumerics or `.`, `-`, `=`, `^` (covers `BRK-B`, `GC=F`, `^GSPC`).
pub fn normalize_instrument_id(raw: &str) -> Result<String, AnalysisFailure> {
    let id = raw.trim().to_ascii_uppercase();
    if id.is_empty() {
        return Err(AnalysisFailure::new(raw, FailureKind::InvalidInput, "empty instrument id"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(AnalysisFailure::new(
            raw,
            FailureKind::InvalidInput,
            format!("instrument id longer than {MAX_ID_LEN} characters"),
        ));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '=' | '^')))
    {
        return Err(AnalysisFailure::new(
            raw,
            FailureKind::InvalidInput,
            format!("invalid character {bad:?} in instrument id"),
        ));
    }
    Ok(id)
}

/// Shared, cheaply clonable handle on the collaborators and configuration.
#[derive(Clone)]
pub struct Analyzer {
    prices: Arc<dyn PriceDataSource>,
    sentiment: Option<Arc<dyn SentimentSource>>,
    config: Arc<AnalysisConfig>,
}

impl Analyzer {
    /// Build without rejecting a bad config.  Validation problems are logged;
    /// a zero timeout, for instance, fails every instrument with TIMEOUT.
    /// Use [`try_new`](Self::try_new) to refuse such configs up front.
    pub fn new(prices: Arc<dyn PriceDataSource>, config: AnalysisConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!(error = %e, "analyzer built with an invalid config");
        }
        Self {
            prices,
            sentiment: None,
            config: Arc::new(config),
        }
    }

    /// Build after `AnalysisConfig::validate` passes.
    pub fn try_new(prices: Arc<dyn PriceDataSource>, config: AnalysisConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            prices,
            sentiment: None,
            config: Arc::new(config),
        })
    }

    pub fn with_sentiment(mut self, source: Arc<dyn SentimentSource>) -> Self {
        self.sentiment = Some(source);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse one instrument.  Never panics on bad data; every problem is a
    /// typed failure carrying the instrument id.
    pub async fn analyze_one(
        &self,
        instrument_id: &str,
        class: InstrumentClass,
        sentiment_enabled: bool,
    ) -> InstrumentOutcome {
        let id = normalize_instrument_id(instrument_id)?;

        let lookback = self.config.lookback_for(class);
        let series = with_timeout(&id, "price fetch", self.config.fetch_timeout(), async {
            self.prices
                .fetch(&id, lookback)
                .await
                .map_err(|e| AnalysisFailure::from_source(&id, e))
        })
        .await?;

        if series.is_empty() {
            return Err(AnalysisFailure::new(&id, FailureKind::NoData, "price series is empty"));
        }

        let sentiment = if sentiment_enabled && class == InstrumentClass::Equity {
            self.fetch_sentiment(&id).await?
        } else {
            None
        };

        self.evaluate(id, class, &series, sentiment)
    }

    /// Run the compute path on a caller-held series.  Sentiment is only
    /// consulted for equities.
    pub fn analyze_series(
        &self,
        instrument_id: &str,
        class: InstrumentClass,
        series: &PriceSeries,
        sentiment: Option<SentimentSummary>,
    ) -> InstrumentOutcome {
        let id = normalize_instrument_id(instrument_id)?;
        if series.is_empty() {
            return Err(AnalysisFailure::new(&id, FailureKind::NoData, "price series is empty"));
        }
        let sentiment = match class {
            InstrumentClass::Equity => sentiment,
            InstrumentClass::Commodity => None,
        };
        self.evaluate(id, class, series, sentiment)
    }

    async fn fetch_sentiment(&self, id: &str) -> Result<Option<SentimentSummary>, AnalysisFailure> {
        let Some(source) = self.sentiment.as_ref() else {
            warn!(instrument = %id, "sentiment requested but no sentiment source configured");
            return Ok(None);
        };

        let limit = self.config.headline_limit;
        let fetched = with_timeout(id, "headline fetch", self.config.headline_timeout(), async {
            source
                .headlines(id, limit)
                .await
                .map_err(|e| AnalysisFailure::from_source(id, e))
        })
        .await;

        match fetched {
            Ok(headlines) => Ok(Some(summarize(source.as_ref(), headlines))),
            Err(failure) if self.config.tolerate_headline_errors => {
                warn!(
                    instrument = %id,
                    kind = %failure.kind,
                    reason = %failure.reason,
                    "headline fetch failed, using neutral sentiment"
                );
                Ok(Some(SentimentSummary::neutral()))
            }
            Err(failure) => Err(failure),
        }
    }

    fn evaluate(
        &self,
        id: String,
        class: InstrumentClass,
        series: &PriceSeries,
        sentiment: Option<SentimentSummary>,
    ) -> InstrumentOutcome {
        let Some(last) = series.last() else {
            return Err(AnalysisFailure::new(&id, FailureKind::NoData, "price series is empty"));
        };
        let price = last.close;
        let as_of = last.date;

        let frame = IndicatorFrame::compute(series, &self.config.indicators);
        let snapshot = frame.snapshot();

        let deriver = match class {
            InstrumentClass::Equity => SignalDeriver::new(),
            InstrumentClass::Commodity => SignalDeriver::with_context(self.config.commodity.context()),
        };
        let signals = deriver.derive(price, &snapshot);

        let policy = policy_for(class, &self.config.commodity);
        let verdict = policy.recommend(&PolicyInput {
            signals: &signals,
            snapshot: &snapshot,
            sentiment: sentiment.as_ref().map(|s| s.average),
        });

        debug!(
            instrument = %id,
            policy = policy.name(),
            bars = series.len(),
            signals = ?signals.names(),
            recommendation = %verdict.recommendation,
            confidence = verdict.confidence,
            "instrument analysed"
        );

        Ok(AnalysisResult {
            instrument_id: id,
            class,
            latest_price: price,
            as_of,
            indicators: snapshot,
            signals,
            recommendation: verdict.recommendation,
            confidence: verdict.confidence,
            bullish_count: verdict.bullish_count,
            bearish_count: verdict.bearish_count,
            sentiment,
        })
    }
}

/// Bound a collaborator call; an elapsed deadline becomes a `TIMEOUT` failure.
async fn with_timeout<T, F>(id: &str, what: &str, limit: Duration, call: F) -> Result<T, AnalysisFailure>
where
    F: std::future::Future<Output = Result<T, AnalysisFailure>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AnalysisFailure::new(
            id,
            FailureKind::Timeout,
            format!("{what} exceeded {} ms", limit.as_millis()),
        )),
    }
}

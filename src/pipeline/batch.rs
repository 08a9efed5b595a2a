// =============================================================================
// Batch fan-out / fan-in
// =============================================================================
//
// One spawned task per instrument, gated by a semaphore sized to
// min(N, cap).  Tasks share nothing mutable; each owns its series, frame and
// result.  The join is a barrier: the report holds exactly one entry per
// submitted instrument, in submission order.
//
// A task that panics surfaces as an INTERNAL failure for its own instrument
// and never disturbs its siblings.
//
// =============================================================================

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use super::analyzer::Analyzer;
use super::result::{BatchEntry, BatchReport, InstrumentOutcome};
use crate::error::{AnalysisFailure, FailureKind};
use crate::types::{Instrument, InstrumentClass};

impl Analyzer {
    /// Analyse caller-supplied (id, class) pairs concurrently.
    ///
    /// `concurrency` overrides the configured cap; `None` uses
    /// `min(N, max_concurrency)`.  Zero is treated as one.
    pub async fn analyze_batch(
        &self,
        instruments: &[Instrument],
        concurrency: Option<usize>,
        sentiment_enabled: bool,
    ) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let workers = match concurrency {
            Some(limit) => instruments.len().min(limit).max(1),
            None => self.config().pool_size(instruments.len()),
        };
        let semaphore = Arc::new(Semaphore::new(workers));

        info!(
            run_id = %run_id,
            instruments = instruments.len(),
            workers,
            sentiment_enabled,
            "batch analysis started"
        );

        let mut handles = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let analyzer = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let id = instrument.id.clone();
            let class = instrument.class;

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return Err(AnalysisFailure::new(id, FailureKind::Internal, "worker pool closed"));
                    }
                };
                analyzer.analyze_one(&id, class, sentiment_enabled).await
            });
            handles.push(handle);
        }

        let joined = join_all(handles).await;

        let entries: Vec<BatchEntry> = instruments
            .iter()
            .zip(joined)
            .map(|(instrument, joined)| {
                let outcome: InstrumentOutcome = match joined {
                    Ok(outcome) => outcome,
                    Err(e) => Err(AnalysisFailure::new(
                        instrument.id.clone(),
                        FailureKind::Internal,
                        format!("analysis task aborted: {e}"),
                    )),
                };
                if let Err(failure) = &outcome {
                    warn!(
                        run_id = %run_id,
                        instrument = %failure.instrument_id,
                        kind = %failure.kind,
                        reason = %failure.reason,
                        "instrument analysis failed"
                    );
                }
                BatchEntry {
                    instrument_id: instrument.id.clone(),
                    outcome,
                }
            })
            .collect();

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            entries,
        };

        info!(
            run_id = %run_id,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            buy_candidates = report.buy_candidates().count(),
            sell_candidates = report.sell_candidates().count(),
            elapsed_ms = report.elapsed().num_milliseconds(),
            "batch analysis finished"
        );

        report
    }

    /// Analyse a list of ids that all share one class.
    pub async fn analyze_batch_of_class<S: AsRef<str>>(
        &self,
        instrument_ids: &[S],
        class: InstrumentClass,
        concurrency: Option<usize>,
        sentiment_enabled: bool,
    ) -> BatchReport {
        let instruments: Vec<Instrument> = instrument_ids
            .iter()
            .map(|id| Instrument::new(id.as_ref(), class))
            .collect();
        self.analyze_batch(&instruments, concurrency, sentiment_enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::error::SourceError;
    use crate::market_data::bar::test_support::series_from_closes;
    use crate::market_data::{InMemoryPriceSource, PriceDataSource, PriceSeries};
    use crate::types::Recommendation;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn rising(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        series_from_closes(&closes)
    }

    /// Ids starting with "HANG" never answer; ids starting with "BOOM" panic.
    struct ScriptedSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceDataSource for ScriptedSource {
        async fn fetch(&self, id: &str, _lookback: usize) -> Result<PriceSeries, SourceError> {
            if id.starts_with("HANG") {
                std::future::pending::<()>().await;
            }
            if id.starts_with("BOOM") {
                panic!("source exploded for {id}");
            }
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(rising(60))
        }
    }

    fn fast_timeout_config() -> AnalysisConfig {
        AnalysisConfig {
            fetch_timeout_ms: 200,
            ..AnalysisConfig::default()
        }
    }

    #[tokio::test]
    async fn no_data_instrument_does_not_affect_sibling() {
        let source = InMemoryPriceSource::new()
            .with_series("AAPL", rising(60))
            .with_series("ZZZ", PriceSeries::empty());
        let analyzer = Analyzer::new(Arc::new(source), AnalysisConfig::default());

        let report = analyzer
            .analyze_batch_of_class(&["AAPL", "ZZZ"], InstrumentClass::Equity, None, false)
            .await;

        assert_eq!(report.len(), 2);
        let aapl = report.get("AAPL").unwrap().outcome.as_ref().unwrap();
        assert_eq!(aapl.instrument_id, "AAPL");
        let zzz = report.get("ZZZ").unwrap().outcome.as_ref().unwrap_err();
        assert_eq!(zzz.kind, FailureKind::NoData);
    }

    #[tokio::test]
    async fn timeouts_are_isolated_and_every_id_is_accounted_for() {
        let ids: Vec<String> = (0..10)
            .map(|i| if i % 3 == 1 { format!("HANG{i}") } else { format!("OK{i}") })
            .collect();
        assert_eq!(ids.iter().filter(|id| id.starts_with("HANG")).count(), 3);

        let analyzer = Analyzer::new(Arc::new(ScriptedSource::new()), fast_timeout_config());
        let report = analyzer
            .analyze_batch_of_class(&ids, InstrumentClass::Equity, None, false)
            .await;

        assert_eq!(report.len(), 10);
        assert_eq!(report.success_count(), 7);
        assert_eq!(report.failure_count(), 3);
        assert_eq!(report.failures_of(FailureKind::Timeout).count(), 3);

        let seen: HashSet<&str> = report.entries.iter().map(|e| e.instrument_id.as_str()).collect();
        assert_eq!(seen.len(), 10);
        let submitted: Vec<&str> = ids.iter().map(String::as_str).collect();
        let returned: Vec<&str> = report.entries.iter().map(|e| e.instrument_id.as_str()).collect();
        assert_eq!(returned, submitted);
        for failure in report.failures() {
            assert!(failure.instrument_id.starts_with("HANG"));
        }
    }

    #[tokio::test]
    async fn worker_pool_caps_concurrent_fetches() {
        let source = Arc::new(ScriptedSource::new());
        let analyzer = Analyzer::new(source.clone(), AnalysisConfig::default());
        let ids: Vec<String> = (0..12).map(|i| format!("OK{i}")).collect();

        let report = analyzer
            .analyze_batch_of_class(&ids, InstrumentClass::Equity, Some(3), false)
            .await;

        assert_eq!(report.success_count(), 12);
        let peak = source.peak.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 3, "peak concurrency was {peak}");
    }

    #[tokio::test]
    async fn panicking_task_becomes_internal_failure() {
        let analyzer = Analyzer::new(Arc::new(ScriptedSource::new()), AnalysisConfig::default());
        let report = analyzer
            .analyze_batch_of_class(&["OK1", "BOOM", "OK2"], InstrumentClass::Equity, None, false)
            .await;

        assert_eq!(report.success_count(), 2);
        let boom = report.get("BOOM").unwrap().outcome.as_ref().unwrap_err();
        assert_eq!(boom.kind, FailureKind::Internal);
        assert_eq!(boom.instrument_id, "BOOM");
    }

    #[tokio::test]
    async fn mixed_classes_and_invalid_ids() {
        let source = InMemoryPriceSource::new()
            .with_series("GC=F", rising(90))
            .with_series("MSFT", rising(60));
        let analyzer = Analyzer::new(Arc::new(source), AnalysisConfig::default());

        let instruments = vec![
            Instrument::commodity("gc=f"),
            Instrument::equity("MSFT"),
            Instrument::equity("not valid"),
        ];
        let report = analyzer.analyze_batch(&instruments, Some(0), false).await;

        assert_eq!(report.len(), 3);
        let gold = report.get("gc=f").unwrap().outcome.as_ref().unwrap();
        assert_eq!(gold.instrument_id, "GC=F");
        assert_eq!(gold.class, InstrumentClass::Commodity);
        assert_eq!(gold.recommendation, Recommendation::TakeProfits);

        let bad = report.get("not valid").unwrap().outcome.as_ref().unwrap_err();
        assert_eq!(bad.kind, FailureKind::InvalidInput);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_report() {
        let analyzer = Analyzer::new(Arc::new(InMemoryPriceSource::new()), AnalysisConfig::default());
        let report = analyzer
            .analyze_batch_of_class::<&str>(&[], InstrumentClass::Equity, None, false)
            .await;
        assert!(report.is_empty());
    }
}

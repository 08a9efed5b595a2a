// =============================================================================
// Sentiment — headline collaborator and polarity averaging
// =============================================================================
//
// The source returns recent headlines for an instrument and scores each one
// on [-1, 1].  The pipeline only consumes the average; the per-headline
// scores are kept for presentation.
//
// =============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Headline retrieval plus polarity scoring.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    /// Up to `limit` recent headlines, most relevant first.  An empty list is
    /// a valid answer.
    async fn headlines(&self, instrument_id: &str, limit: usize) -> Result<Vec<String>, SourceError>;

    /// Polarity of one headline in [-1, 1].
    fn score(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub headline: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean of the headline scores; 0 when there are none.
    pub average: f64,
    pub headlines: Vec<ScoredHeadline>,
}

impl SentimentSummary {
    /// The zero-contribution summary used when no headlines are available.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn from_scored(headlines: Vec<ScoredHeadline>) -> Self {
        let average = if headlines.is_empty() {
            0.0
        } else {
            headlines.iter().map(|h| h.score).sum::<f64>() / headlines.len() as f64
        };
        Self { average, headlines }
    }
}

/// Score every headline with `source`, clamp to [-1, 1] and average.
/// Headlines whose score is not finite are dropped.
pub fn summarize(source: &dyn SentimentSource, headlines: Vec<String>) -> SentimentSummary {
    let scored = headlines
        .into_iter()
        .filter_map(|headline| {
            let score = source.score(&headline);
            score.is_finite().then(|| ScoredHeadline {
                headline,
                score: score.clamp(-1.0, 1.0),
            })
        })
        .collect();
    SentimentSummary::from_scored(scored)
}

// ---------------------------------------------------------------------------
// StaticSentimentSource -- fixed headlines and a lookup score table
// ---------------------------------------------------------------------------

/// Offline source: headlines per instrument and an exact-match score table.
/// Text missing from the table scores 0.
#[derive(Default)]
pub struct StaticSentimentSource {
    headlines: RwLock<HashMap<String, Vec<String>>>,
    scores: RwLock<HashMap<String, f64>>,
}

impl StaticSentimentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_headlines<I, S>(&self, instrument_id: impl Into<String>, headlines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headlines
            .write()
            .insert(instrument_id.into(), headlines.into_iter().map(Into::into).collect());
    }

    pub fn set_score(&self, text: impl Into<String>, score: f64) {
        self.scores.write().insert(text.into(), score);
    }

    /// Builder form: register `(headline, score)` pairs for one instrument.
    pub fn with_scored<S: Into<String>>(self, instrument_id: impl Into<String>, items: Vec<(S, f64)>) -> Self {
        let mut texts = Vec::with_capacity(items.len());
        for (text, score) in items {
            let text = text.into();
            self.set_score(text.clone(), score);
            texts.push(text);
        }
        self.set_headlines(instrument_id, texts);
        self
    }
}

#[async_trait]
impl SentimentSource for StaticSentimentSource {
    async fn headlines(&self, instrument_id: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let map = self.headlines.read();
        Ok(map
            .get(instrument_id)
            .map(|list| list.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn score(&self, text: &str) -> f64 {
        self.scores.read().get(text).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_headlines_are_neutral() {
        let source = StaticSentimentSource::new();
        let summary = summarize(&source, Vec::new());
        assert_eq!(summary.average, 0.0);
        assert!(summary.headlines.is_empty());
        assert_eq!(summary, SentimentSummary::neutral());
    }

    #[test]
    fn average_of_scores() {
        let source = StaticSentimentSource::new().with_scored("AAPL", vec![("up", 0.5), ("down", -0.1)]);
        let summary = summarize(&source, vec!["up".into(), "down".into()]);
        assert!((summary.average - 0.2).abs() < 1e-10);
        assert_eq!(summary.headlines[1].headline, "down");
    }

    #[test]
    fn scores_are_clamped_and_nan_dropped() {
        let source = StaticSentimentSource::new();
        source.set_score("euphoric", 4.0);
        source.set_score("broken", f64::NAN);
        let summary = summarize(&source, vec!["euphoric".into(), "broken".into(), "unknown".into()]);
        assert_eq!(summary.headlines.len(), 2);
        assert_eq!(summary.headlines[0].score, 1.0);
        assert_eq!(summary.headlines[1].score, 0.0);
        assert!((summary.average - 0.5).abs() < 1e-10);
    }

    #[tokio::test]
    async fn headlines_respect_limit_and_unknown_ids() {
        let source = StaticSentimentSource::new();
        source.set_headlines("MSFT", ["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(source.headlines("MSFT", 5).await.unwrap().len(), 5);
        assert!(source.headlines("NOPE", 5).await.unwrap().is_empty());
    }
}

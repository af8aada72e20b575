//! Request pipeline: runs the sentiment backend and the profanity detector
//! concurrently, merges the signals, and assembles the full analysis.
//!
//! Both external-style calls are bounded by the configured timeout and
//! fail open: a backend error or timeout degrades to a neutral reading
//! (or an empty profanity signal) and the request is never failed over a
//! scoring glitch.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::ModerationConfig;
use crate::correct;
use crate::profanity::{ProfanityFilter, ProfanitySignal};
use crate::score::Label;
use crate::sentiment::{Inference, Method, SentimentAnalyzer};
use crate::suggest::{self, SuggestionInputs};
use crate::verdict::{self, Verdict};

/// One backend reading, already bucketed and normalized.
#[derive(Debug, Clone, Copy)]
pub struct SentimentReading {
    pub method: Method,
    pub raw_score: f32,
    /// The raw score rescaled onto the shared `[0, 1]` interval.
    pub normalized: f32,
    pub label: Label,
    pub confidence: f32,
}

/// Everything the HTTP layer needs to answer a single text.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub sentiment: SentimentReading,
    pub profanity: ProfanitySignal,
    pub verdict: Verdict,
    pub suggestions: Vec<String>,
    pub corrected_text: String,
}

/// Long-lived service object: constructed once at startup and shared by
/// every request handler.
pub struct ModerationEngine {
    analyzer: SentimentAnalyzer,
    filter: ProfanityFilter,
    config: Arc<ModerationConfig>,
}

impl ModerationEngine {
    pub fn new(config: Arc<ModerationConfig>) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(),
            filter: ProfanityFilter::new(),
            config,
        }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Full pipeline for one already-validated text.
    pub async fn analyze(&self, text: &str, method: Method) -> Analysis {
        let budget = Duration::from_millis(self.config.service.backend_timeout_ms);

        let (inference, signal) = tokio::join!(
            self.sentiment_fail_open(text, method, budget),
            self.profanity_fail_open(text, budget),
        );

        let table = self.config.thresholds_for(method);
        let sentiment = SentimentReading {
            method,
            raw_score: inference.raw_score,
            normalized: method.range().to_unit_interval(inference.raw_score),
            label: table.label(inference.raw_score),
            confidence: inference.confidence,
        };

        let cutoff = self.config.service.offensive_cutoff;
        let verdict = verdict::merge(sentiment.normalized, sentiment.confidence, &signal, cutoff);

        let suggestions = suggest::suggest(
            &SuggestionInputs {
                text,
                normalized_sentiment: sentiment.normalized,
                profanity_count: signal.count,
            },
            &self.config.suggestions,
            cutoff,
            self.config.service.long_text_limit,
            self.config.service.max_suggestions,
        );

        let corrected_text = correct::correct(text, &signal.words);

        dev_log_analysis(text, &sentiment, &signal, &verdict);

        Analysis {
            sentiment,
            profanity: signal,
            verdict,
            suggestions,
            corrected_text,
        }
    }

    async fn sentiment_fail_open(&self, text: &str, method: Method, budget: Duration) -> Inference {
        match timeout(budget, self.analyzer.infer(text, method)).await {
            Ok(Ok(inference)) => inference,
            Ok(Err(e)) => {
                warn!(error = %e, method = method.as_str(), "sentiment backend failed; using neutral fallback");
                Inference::neutral(method.range())
            }
            Err(_) => {
                warn!(method = method.as_str(), "sentiment backend timed out; using neutral fallback");
                Inference::neutral(method.range())
            }
        }
    }

    async fn profanity_fail_open(&self, text: &str, budget: Duration) -> ProfanitySignal {
        match timeout(budget, async { self.filter.detect(text) }).await {
            Ok(signal) => signal,
            Err(_) => {
                warn!("profanity detector timed out; continuing without signal");
                ProfanitySignal::default()
            }
        }
    }
}

// Dev logging gate: MODERATION_DEV_LOG=1 AND a dev environment (debug build
// or SHUTTLE_ENV in {local, development, dev}).
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("MODERATION_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short anonymized id for a text. User content itself is never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn dev_log_analysis(
    text: &str,
    sentiment: &SentimentReading,
    signal: &ProfanitySignal,
    verdict: &Verdict,
) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    info!(
        target: "moderation",
        %id,
        method = sentiment.method.as_str(),
        score = sentiment.raw_score,
        normalized = sentiment.normalized,
        label = sentiment.label.as_str(),
        profanity = signal.count,
        offensive = verdict.is_offensive,
        confidence = verdict.confidence,
        "analyzed"
    );
}

/// Human-readable elapsed time for request logs.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ModerationEngine {
        let config = Arc::new(ModerationConfig::embedded().expect("embedded config"));
        ModerationEngine::new(config)
    }

    #[tokio::test]
    async fn offensive_text_end_to_end() {
        let analysis = engine()
            .analyze("Este producto es una mierda", Method::Stars)
            .await;
        assert!(analysis.verdict.is_offensive);
        assert!(analysis.profanity.has_profanity());
        assert_eq!(analysis.corrected_text, "Este producto es una problema");
        assert!(!analysis.suggestions.is_empty());
        assert!(analysis.suggestions.len() <= 5);
    }

    #[tokio::test]
    async fn clean_text_is_not_offensive() {
        let analysis = engine()
            .analyze("Hola, me encanta este proyecto", Method::Stars)
            .await;
        assert!(!analysis.verdict.is_offensive);
        assert_eq!(analysis.profanity.count, 0);
        assert_eq!(analysis.corrected_text, "Hola, me encanta este proyecto");
        // Nothing fired, so exactly the positive block comes back.
        assert_eq!(analysis.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn every_method_produces_a_bounded_reading() {
        let engine = engine();
        for method in Method::ALL {
            let analysis = engine.analyze("Estoy muy enojado con el servicio", method).await;
            assert!((0.0..=1.0).contains(&analysis.sentiment.normalized));
            assert!((0.0..=1.0).contains(&analysis.verdict.confidence));
        }
    }

    #[tokio::test]
    async fn negative_without_profanity_is_still_offensive() {
        let analysis = engine()
            .analyze(
                "Estoy muy enojado con el servicio, son unos incompetentes",
                Method::Stars,
            )
            .await;
        assert!(analysis.verdict.is_offensive);
        assert_eq!(analysis.profanity.count, 0);
    }

    #[test]
    fn anon_hash_is_stable_and_short() {
        assert_eq!(anon_hash("hola"), anon_hash("hola"));
        assert_eq!(anon_hash("hola").len(), 12);
        assert_ne!(anon_hash("hola"), anon_hash("adios"));
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::from_millis(142)), "142ms");
        assert_eq!(format_elapsed(Duration::from_millis(1250)), "1.25s");
    }
}

//! Interchangeable sentiment backends over a shared Spanish opinion lexicon.
//!
//! Every backend implements [`SentimentBackend`] and reports on its own
//! native scale; dispatch over [`Method`] is exhaustive so an unknown
//! identifier cannot get past the boundary. Backends never panic on odd
//! input: no lexicon hit means a neutral reading with zero confidence.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalize;
use crate::score::ScoreRange;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Identifier of a configured scoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Stars,
    Valence,
    Ratio,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Stars, Method::Valence, Method::Ratio];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stars" => Some(Method::Stars),
            "valence" => Some(Method::Valence),
            "ratio" => Some(Method::Ratio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Stars => "stars",
            Method::Valence => "valence",
            Method::Ratio => "ratio",
        }
    }

    pub fn range(&self) -> ScoreRange {
        match self {
            Method::Stars | Method::Ratio => ScoreRange::Unit,
            Method::Valence => ScoreRange::Signed,
        }
    }

    /// Native bounds of the backend's raw score, for API metadata.
    pub fn score_bounds(&self) -> [f32; 2] {
        match self {
            Method::Stars => [0.2, 1.0],
            Method::Valence => [-1.0, 1.0],
            Method::Ratio => [0.0, 1.0],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Method::Stars => "Star-rating lexicon: mean opinion-word weight mapped to 1-5 stars",
            Method::Valence => "Signed polarity with a 3-token negation window",
            Method::Ratio => "Positive/negative hit ratio over opinion words",
        }
    }
}

/// Raw backend output, before bucket labeling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub raw_score: f32,
    pub confidence: f32,
}

impl Inference {
    /// Neutral fallback on the given native scale.
    pub fn neutral(range: ScoreRange) -> Self {
        Self {
            raw_score: range.neutral(),
            confidence: 0.0,
        }
    }
}

#[async_trait]
pub trait SentimentBackend: Send + Sync {
    async fn infer(&self, text: &str) -> anyhow::Result<Inference>;
}

/// Fraction of tokens carrying opinion signal; doubles as the confidence.
fn coverage(hits: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        (hits as f32 / total as f32).clamp(0.0, 1.0)
    }
}

#[inline]
fn word_weight(w: &str) -> i32 {
    *LEXICON.get(w).unwrap_or(&0)
}

fn is_negator(tok: &str) -> bool {
    matches!(tok, "no" | "nunca" | "jamás" | "ni" | "sin" | "tampoco")
}

/// Mean opinion-word weight mapped to a 1-5 star rating, reported as stars/5.
#[derive(Debug, Default)]
pub struct StarsBackend;

#[async_trait]
impl SentimentBackend for StarsBackend {
    async fn infer(&self, text: &str) -> anyhow::Result<Inference> {
        let tokens: Vec<String> = normalize::tokenize(text).collect();
        let mut sum = 0i32;
        let mut hits = 0usize;
        for t in &tokens {
            let w = word_weight(t.as_str());
            if w != 0 {
                sum += w;
                hits += 1;
            }
        }
        if hits == 0 {
            // Three stars when nothing opinionated was found.
            return Ok(Inference {
                raw_score: 3.0 / 5.0,
                confidence: 0.0,
            });
        }
        let mean = sum as f32 / hits as f32; // [-3, 3]
        let stars = 3.0 + mean * (2.0 / 3.0); // [1, 5]
        Ok(Inference {
            raw_score: stars / 5.0,
            confidence: coverage(hits, tokens.len()),
        })
    }
}

/// Signed polarity in [-1, 1]. A negator within the previous 1..=3 tokens
/// inverts the sign of the word's lexicon weight.
#[derive(Debug, Default)]
pub struct ValenceBackend;

#[async_trait]
impl SentimentBackend for ValenceBackend {
    async fn infer(&self, text: &str) -> anyhow::Result<Inference> {
        let tokens: Vec<String> = normalize::tokenize(text).collect();
        let mut sum = 0i32;
        let mut hits = 0usize;

        for i in 0..tokens.len() {
            let base = word_weight(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            sum += if negated { -base } else { base };
            hits += 1;
        }

        if hits == 0 {
            return Ok(Inference {
                raw_score: 0.0,
                confidence: 0.0,
            });
        }
        let raw = (sum as f32 / (3.0 * hits as f32)).clamp(-1.0, 1.0);
        Ok(Inference {
            raw_score: raw,
            confidence: coverage(hits, tokens.len()),
        })
    }
}

/// Positive hits over total opinionated hits; 0.5 when nothing matched.
#[derive(Debug, Default)]
pub struct RatioBackend;

#[async_trait]
impl SentimentBackend for RatioBackend {
    async fn infer(&self, text: &str) -> anyhow::Result<Inference> {
        let tokens: Vec<String> = normalize::tokenize(text).collect();
        let mut pos = 0usize;
        let mut neg = 0usize;
        for t in &tokens {
            match word_weight(t.as_str()) {
                w if w > 0 => pos += 1,
                w if w < 0 => neg += 1,
                _ => {}
            }
        }
        let hits = pos + neg;
        if hits == 0 {
            return Ok(Inference {
                raw_score: 0.5,
                confidence: 0.0,
            });
        }
        Ok(Inference {
            raw_score: pos as f32 / hits as f32,
            confidence: coverage(hits, tokens.len()),
        })
    }
}

/// Long-lived service object holding one engine per configured method.
#[derive(Debug, Default)]
pub struct SentimentAnalyzer {
    stars: StarsBackend,
    valence: ValenceBackend,
    ratio: RatioBackend,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn infer(&self, text: &str, method: Method) -> anyhow::Result<Inference> {
        match method {
            Method::Stars => self.stars.infer(text).await,
            Method::Valence => self.valence.infer(text).await,
            Method::Ratio => self.ratio.infer(text).await,
        }
    }
}

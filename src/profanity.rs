//! Profanity detection over a static Spanish term list.
//!
//! Matching runs on the normalized token stream (lower-cased, de-obfuscated).
//! Multi-word phrases are matched first against the joined stream, then each
//! token is checked for an exact hit and, failing that, a near-miss by
//! normalized edit similarity. Matches always report the canonical lexicon
//! term, so downstream correction can look it up directly.
//!
//! Detection failure must never block the sentiment half of the pipeline:
//! [`ProfanityFilter::detect`] is fail-open and degrades to an empty signal.

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::normalize;

static TERMS: Lazy<LexiconFile> = Lazy::new(|| {
    let raw = include_str!("../profanity_lexicon.json");
    serde_json::from_str::<LexiconFile>(raw).expect("valid profanity lexicon")
});

#[derive(Debug, Deserialize)]
struct LexiconFile {
    terms: Vec<String>,
}

/// Near-miss similarity cutoff, aligned with the upstream detector's 0.9.
const FUZZY_THRESHOLD: f64 = 0.9;
/// Short tokens are exact-match only; fuzzy matching kicks in from this length.
const FUZZY_MIN_LEN: usize = 4;

/// Count + ordered matched terms for a single text. May contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfanitySignal {
    pub count: usize,
    pub words: Vec<String>,
}

impl ProfanitySignal {
    pub fn has_profanity(&self) -> bool {
        self.count > 0
    }
}

#[derive(Debug, Default)]
pub struct ProfanityFilter;

impl ProfanityFilter {
    pub fn new() -> Self {
        Self
    }

    /// Fail-open detection: any internal failure yields an empty signal.
    pub fn detect(&self, text: &str) -> ProfanitySignal {
        match self.try_detect(text) {
            Ok(signal) => signal,
            Err(e) => {
                warn!(error = %e, "profanity detection failed; continuing without signal");
                ProfanitySignal::default()
            }
        }
    }

    fn try_detect(&self, text: &str) -> anyhow::Result<ProfanitySignal> {
        let tokens = normalize::matching_tokens(text);
        let joined = tokens.join(" ");

        let mut words = Vec::new();

        // Phrases first, so correction can rewrite them before their parts.
        for term in TERMS.terms.iter().filter(|t| t.contains(' ')) {
            for _ in joined.match_indices(term.as_str()) {
                words.push(term.clone());
            }
        }

        for token in &tokens {
            if let Some(term) = match_token(token) {
                words.push(term.to_string());
            }
        }

        Ok(ProfanitySignal {
            count: words.len(),
            words,
        })
    }
}

/// Exact lexicon hit, else the most similar single-word term above the cutoff.
fn match_token(token: &str) -> Option<&'static str> {
    let single_words = TERMS.terms.iter().filter(|t| !t.contains(' '));

    for term in single_words.clone() {
        if token == term.as_str() {
            return Some(term.as_str());
        }
    }

    if token.chars().count() < FUZZY_MIN_LEN {
        return None;
    }

    let mut best: Option<(&'static str, f64)> = None;
    for term in single_words {
        if term.chars().count() < FUZZY_MIN_LEN {
            continue;
        }
        let sim = strsim::normalized_levenshtein(token, term);
        if sim >= FUZZY_THRESHOLD && best.map(|(_, b)| sim > b).unwrap_or(true) {
            best = Some((term.as_str(), sim));
        }
    }
    best.map(|(term, _)| term)
}

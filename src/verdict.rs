//! Merges the normalized sentiment reading and the profanity signal into
//! the final offensiveness verdict.
//!
//! The cutoff comparison happens on the backend-agnostic `[0, 1]` scale,
//! never on a backend's raw output, so signed-range backends behave the
//! same as unit-range ones.

use crate::profanity::ProfanitySignal;

/// Confidence penalty per detected profane word.
pub const PENALTY_PER_WORD: f32 = 0.1;
/// Ceiling on the total profanity penalty, however many words matched.
pub const MAX_PROFANITY_PENALTY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_offensive: bool,
    pub confidence: f32,
}

/// Pure merge of the two signals; `normalized_sentiment` must already be
/// on the `[0, 1]` scale.
pub fn merge(
    normalized_sentiment: f32,
    sentiment_confidence: f32,
    profanity: &ProfanitySignal,
    offensive_cutoff: f32,
) -> Verdict {
    let is_offensive = normalized_sentiment < offensive_cutoff || profanity.count > 0;
    let penalty = MAX_PROFANITY_PENALTY.min(profanity.count as f32 * PENALTY_PER_WORD);
    let confidence = (sentiment_confidence - penalty).clamp(0.0, 1.0);
    Verdict {
        is_offensive,
        confidence,
    }
}

//! Suggestion templates keyed on the merged analysis signals.
//!
//! Blocks fire in a fixed order (emotion, profanity, length) and each
//! contributes its whole template block; when nothing fired the positive
//! block is returned instead. The final list is truncated, which may cut
//! a block mid-way.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionTemplates {
    pub negative_emotion: Vec<String>,
    pub profanity: Vec<String>,
    pub length: Vec<String>,
    pub positive: Vec<String>,
}

pub struct SuggestionInputs<'a> {
    pub text: &'a str,
    /// Sentiment on the backend-agnostic `[0, 1]` scale.
    pub normalized_sentiment: f32,
    pub profanity_count: usize,
}

pub fn suggest(
    inputs: &SuggestionInputs<'_>,
    templates: &SuggestionTemplates,
    offensive_cutoff: f32,
    long_text_limit: usize,
    max_suggestions: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    if inputs.normalized_sentiment < offensive_cutoff {
        out.extend(templates.negative_emotion.iter().cloned());
    }
    if inputs.profanity_count > 0 {
        out.extend(templates.profanity.iter().cloned());
    }
    if inputs.text.chars().count() > long_text_limit {
        out.extend(templates.length.iter().cloned());
    }
    if out.is_empty() {
        out.extend(templates.positive.iter().cloned());
    }

    out.truncate(max_suggestions);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> SuggestionTemplates {
        SuggestionTemplates {
            negative_emotion: vec!["e1".into(), "e2".into(), "e3".into(), "e4".into()],
            profanity: vec!["p1".into(), "p2".into(), "p3".into(), "p4".into()],
            length: vec!["l1".into(), "l2".into(), "l3".into()],
            positive: vec!["ok1".into(), "ok2".into(), "ok3".into()],
        }
    }

    fn run(text: &str, sentiment: f32, profanity: usize) -> Vec<String> {
        suggest(
            &SuggestionInputs {
                text,
                normalized_sentiment: sentiment,
                profanity_count: profanity,
            },
            &templates(),
            0.4,
            280,
            5,
        )
    }

    #[test]
    fn clean_text_gets_exactly_the_positive_block() {
        assert_eq!(run("hola", 0.8, 0), vec!["ok1", "ok2", "ok3"]);
    }

    #[test]
    fn emotion_block_precedes_profanity_block() {
        let out = run("texto", 0.2, 1);
        assert_eq!(out, vec!["e1", "e2", "e3", "e4", "p1"]);
    }

    #[test]
    fn never_more_than_five() {
        let long = "a".repeat(300);
        let out = run(&long, 0.2, 2);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn length_block_fires_past_the_limit() {
        let long = "a".repeat(281);
        let out = run(&long, 0.9, 0);
        assert_eq!(out, vec!["l1", "l2", "l3"]);
    }

    #[test]
    fn boundary_length_does_not_fire() {
        let exactly = "a".repeat(280);
        let out = run(&exactly, 0.9, 0);
        assert_eq!(out, vec!["ok1", "ok2", "ok3"]);
    }
}

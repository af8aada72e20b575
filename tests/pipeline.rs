// tests/pipeline.rs
//
// End-to-end checks on the moderation engine itself (no HTTP involved):
// suggestion block ordering, correction idempotence, and the fail-open
// confidence bounds under heavy profanity.

use std::sync::Arc;

use texto_guard::config::ModerationConfig;
use texto_guard::correct::correct;
use texto_guard::engine::ModerationEngine;
use texto_guard::sentiment::Method;

fn engine() -> ModerationEngine {
    let config = Arc::new(ModerationConfig::embedded().expect("embedded config"));
    ModerationEngine::new(config)
}

#[tokio::test]
async fn emotion_suggestions_precede_profanity_suggestions() {
    let config = ModerationConfig::embedded().expect("embedded config");
    let analysis = engine()
        .analyze("Este producto es una mierda, no funciona nada", Method::Stars)
        .await;

    assert!(analysis.verdict.is_offensive);
    assert_eq!(analysis.suggestions.len(), 5);
    // Negative-emotion block first, then the profanity block fills the rest.
    assert_eq!(
        analysis.suggestions[..4],
        config.suggestions.negative_emotion[..]
    );
    assert_eq!(analysis.suggestions[4], config.suggestions.profanity[0]);
}

#[tokio::test]
async fn corrected_text_is_stable_under_reapplication() {
    let analysis = engine()
        .analyze("este pendejo escribe pura mierda", Method::Stars)
        .await;

    assert!(analysis.profanity.count >= 2);
    let again = correct(&analysis.corrected_text, &analysis.profanity.words);
    assert_eq!(analysis.corrected_text, again);
    for word in &analysis.profanity.words {
        assert!(
            !analysis.corrected_text.to_lowercase().contains(word.as_str()),
            "corrected text still contains `{word}`"
        );
    }
}

#[tokio::test]
async fn heavy_profanity_keeps_confidence_in_bounds() {
    let analysis = engine()
        .analyze("puta mierda joder carajo verga pinche", Method::Stars)
        .await;

    assert!(analysis.profanity.count >= 4);
    assert!(analysis.verdict.is_offensive);
    assert!((0.0..=1.0).contains(&analysis.verdict.confidence));
}

#[tokio::test]
async fn long_clean_text_gets_the_length_block() {
    let config = ModerationConfig::embedded().expect("embedded config");
    let text = "la reunión de mañana queda confirmada para todo el equipo ".repeat(6);
    assert!(text.chars().count() > 280);

    let analysis = engine().analyze(&text, Method::Stars).await;
    assert_eq!(analysis.suggestions, config.suggestions.length);
}

#[tokio::test]
async fn methods_disagree_but_all_stay_normalized() {
    let engine = engine();
    for method in Method::ALL {
        let analysis = engine
            .analyze("el servicio es terrible pero el personal es amable", method)
            .await;
        assert!((0.0..=1.0).contains(&analysis.sentiment.normalized));
        let [lo, hi] = method.score_bounds();
        assert!(
            (lo..=hi).contains(&analysis.sentiment.raw_score),
            "{} raw score escaped its native range",
            method.as_str()
        );
    }
}

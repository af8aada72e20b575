//! Text normalization ahead of scoring and profanity matching.
//!
//! The cleaning pass mirrors what the upstream detector expects: decoded
//! HTML entities, collapsed whitespace, and no disruptive symbols while
//! Spanish accents and basic punctuation survive. The obfuscation fold is
//! only used for matching, never for user-facing output.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?¿¡]").expect("disallowed-chars regex"));

/// Clean a text for analysis: decode HTML entities, drop disruptive symbols,
/// collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let stripped = DISALLOWED.replace_all(&decoded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alphanumeric tokens, lower-cased.
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Fold common digit/symbol substitutions back to letters ("mi3rd4" → "mierda").
pub fn fold_obfuscation(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '4' => 'a',
            '3' => 'e',
            '1' => 'i',
            '0' => 'o',
            '5' => 's',
            '7' => 't',
            other => other,
        })
        .collect()
}

/// Lower-cased, de-obfuscated token stream used by the profanity matcher.
pub fn matching_tokens(text: &str) -> Vec<String> {
    let cleaned = clean_text(text);
    tokenize(&cleaned).map(|t| fold_obfuscation(&t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_whitespace_and_strips_symbols() {
        assert_eq!(clean_text("  hola   mundo  "), "hola mundo");
        assert_eq!(clean_text("hola*#mundo"), "holamundo");
        assert_eq!(clean_text("¿qué tal, año nuevo?"), "¿qué tal, año nuevo?");
    }

    #[test]
    fn clean_decodes_html_entities() {
        assert_eq!(clean_text("caf&eacute; rico"), "café rico");
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        let toks: Vec<String> = tokenize("Hola, Mundo!").collect();
        assert_eq!(toks, vec!["hola", "mundo"]);
    }

    #[test]
    fn obfuscation_fold_maps_digits() {
        assert_eq!(fold_obfuscation("mi3rd4"), "mierda");
        assert_eq!(fold_obfuscation("pend3j0"), "pendejo");
    }

    #[test]
    fn matching_tokens_end_to_end() {
        let toks = matching_tokens("Eres un PEND3JO total");
        assert!(toks.contains(&"pendejo".to_string()));
    }
}

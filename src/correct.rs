//! Word-level correction of detected profanity.
//!
//! Replacement is literal-substring and case-insensitive: a term embedded
//! in a longer word is replaced as well. Terms with no entry in the
//! correction map are left untouched even when the detector flagged them.

use once_cell::sync::Lazy;
use regex::{NoExpand, RegexBuilder};
use std::collections::HashMap;

static CORRECTIONS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../corrections.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid corrections map")
});

pub fn correct(text: &str, profanity_words: &[String]) -> String {
    let mut corrected = text.to_string();
    for word in profanity_words {
        let Some(replacement) = CORRECTIONS.get(&word.to_lowercase()) else {
            continue;
        };
        let pattern = match RegexBuilder::new(&regex::escape(word))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re,
            Err(_) => continue,
        };
        corrected = pattern
            .replace_all(&corrected, NoExpand(replacement.as_str()))
            .into_owned();
    }
    corrected
}

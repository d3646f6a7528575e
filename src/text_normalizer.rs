/*!
 * Text normalization for word comparison.
 *
 * Phrase matching and common-phrase inference compare words exclusively
 * through this module, so every comparison in the pipeline agrees on what
 * "the same word" means: lowercased, punctuation stripped, whitespace
 * collapsed away by tokenization.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters removed from a word before comparison
static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w]+").unwrap()
});

/// Canonical form of a single word: lowercased with all non-word characters
/// removed. Returns an empty string for pure punctuation.
pub fn normalize_word(word: &str) -> String {
    NON_WORD_REGEX.replace_all(&word.to_lowercase(), "").to_string()
}

/// Canonical token sequence of a phrase: split on whitespace, each token
/// normalized, tokens that normalize to nothing dropped.
pub fn normalize_phrase(phrase: &str) -> Vec<String> {
    phrase
        .split_whitespace()
        .map(normalize_word)
        .filter(|token| !token.is_empty())
        .collect()
}

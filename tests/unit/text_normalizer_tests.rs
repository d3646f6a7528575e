/*!
 * Tests for word and phrase normalization
 */

use karacut::text_normalizer::{normalize_word, normalize_phrase};

/// Test that normalize_word lowercases and strips punctuation
#[test]
fn test_normalizeWord_withMixedCaseAndPunctuation_shouldCanonicalize() {
    assert_eq!(normalize_word("Hello!"), "hello");
    assert_eq!(normalize_word("BIRTHDAY,"), "birthday");
    assert_eq!(normalize_word("(quick)"), "quick");
}

/// Test that apostrophes are stripped so contractions compare equal
#[test]
fn test_normalizeWord_withApostrophe_shouldStripIt() {
    assert_eq!(normalize_word("don't"), "dont");
    assert_eq!(normalize_word("Dont"), "dont");
}

/// Test that pure punctuation normalizes to an empty string
#[test]
fn test_normalizeWord_withOnlyPunctuation_shouldReturnEmpty() {
    assert_eq!(normalize_word("..."), "");
    assert_eq!(normalize_word("—"), "");
}

/// Test that non-ASCII letters survive normalization
#[test]
fn test_normalizeWord_withAccentedLetters_shouldKeepThem() {
    assert_eq!(normalize_word("Héllo"), "héllo");
}

/// Test that normalize_phrase tokenizes, normalizes and drops empty tokens
#[test]
fn test_normalizePhrase_withMessyInput_shouldReturnCleanTokens() {
    let tokens = normalize_phrase("  Quick,  BROWN fox! ");
    assert_eq!(tokens, vec!["quick", "brown", "fox"]);
}

/// Test that a phrase of only punctuation yields no tokens
#[test]
fn test_normalizePhrase_withOnlyPunctuation_shouldReturnEmpty() {
    assert!(normalize_phrase("!!! ... --").is_empty());
    assert!(normalize_phrase("").is_empty());
}

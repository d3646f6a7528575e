/*!
 * Tests for fitting translated text onto a cue's timing grid
 */

use karacut::translation::timing::{reconcile_cue, ReconciliationStrategy};
use karacut::subtitle_extractor::{Cue, Word};
use crate::common;

/// Test that matching token counts reuse the original windows one-to-one
#[test]
fn test_reconcileCue_withMatchingTokenCount_shouldReuseWindows() {
    let cue = common::make_cue(1, "hello world", 1_000, 500);
    let result = reconcile_cue(&cue, 0, "bonjour monde").unwrap();

    assert_eq!(result.strategy, ReconciliationStrategy::OneToOne);
    assert_eq!(result.words.len(), 2);
    assert_eq!(result.words[0].text, "bonjour");
    assert_eq!(result.words[0].start_time_ms, 1_000);
    assert_eq!(result.words[0].end_time_ms, 1_500);
    assert_eq!(result.words[1].text, "monde");
    assert_eq!(result.words[1].start_time_ms, 1_500);
    assert_eq!(result.words[1].end_time_ms, 2_000);
}

/// Test that one-to-one reconciliation carries the phrase flag per position
#[test]
fn test_reconcileCue_withMatchingTokenCount_shouldCarryPhraseFlags() {
    let mut cue = common::make_cue(1, "happy birthday friend", 1_000, 400);
    cue.words[0].in_phrase = true;
    cue.words[1].in_phrase = true;

    let result = reconcile_cue(&cue, 0, "joyeux anniversaire ami").unwrap();
    let flags: Vec<bool> = result.words.iter().map(|w| w.in_phrase).collect();
    assert_eq!(flags, vec![true, true, false]);
}

/// Test that differing token counts distribute across the full cue span
#[test]
fn test_reconcileCue_withMoreTokens_shouldDistributeAcrossSpan() {
    let cue = common::make_cue(1, "go home", 1_000, 500);
    let result = reconcile_cue(&cue, 0, "rentre à la maison vite").unwrap();

    assert_eq!(result.strategy, ReconciliationStrategy::Proportional);
    assert_eq!(result.words.len(), 5);

    // Grid spans exactly the cue window
    assert_eq!(result.words[0].start_time_ms, cue.start_time_ms);
    assert_eq!(result.words.last().unwrap().end_time_ms, cue.end_time_ms);

    // Contiguous, ordered, every slot non-empty
    for pair in result.words.windows(2) {
        assert_eq!(pair[0].end_time_ms, pair[1].start_time_ms);
    }
    for word in &result.words {
        assert!(word.end_time_ms > word.start_time_ms);
    }
}

/// Test that longer tokens get proportionally wider slots
#[test]
fn test_reconcileCue_withUnevenTokenLengths_shouldWeightByCharacters() {
    let cue = common::make_cue(1, "one", 0, 900);
    let result = reconcile_cue(&cue, 0, "aaaaaaaa b").unwrap();

    let width = |w: &Word| w.end_time_ms - w.start_time_ms;
    assert!(width(&result.words[0]) > width(&result.words[1]));
}

/// Test that proportional distribution carries flags by relative position
#[test]
fn test_reconcileCue_withMoreTokens_shouldCarryFlagsByPosition() {
    let mut cue = common::make_cue(1, "happy birthday", 1_000, 500);
    cue.words[1].in_phrase = true;

    let result = reconcile_cue(&cue, 0, "feliz feliz cumpleaños amigo").unwrap();
    // Tokens mapping onto the second original word keep its flag
    assert!(!result.words[0].in_phrase);
    assert!(result.words[3].in_phrase);
}

/// Test that an empty translation cannot be reconciled
#[test]
fn test_reconcileCue_withEmptyTranslation_shouldReturnNone() {
    let cue = common::make_cue(1, "hello", 1_000, 500);
    assert!(reconcile_cue(&cue, 0, "   ").is_none());
}

/// Test that a cue span too short for one slot per token degrades
#[test]
fn test_reconcileCue_withSpanShorterThanTokenCount_shouldReturnNone() {
    let words = vec![Word::new("hi", 1_000, 1_003)];
    let cue = Cue::new_validated(1, 1_000, 1_003, "hi".to_string(), words).unwrap();

    assert!(reconcile_cue(&cue, 0, "a b c d e").is_none());
}

/// Test that the cue index is preserved on the result
#[test]
fn test_reconcileCue_withAnyInput_shouldKeepCueIndex() {
    let cue = common::make_cue(1, "hello world", 1_000, 500);
    let result = reconcile_cue(&cue, 7, "salut tout le monde").unwrap();
    assert_eq!(result.cue_index, 7);
}

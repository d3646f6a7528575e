/*!
 * Tests for contiguous phrase matching over a clip's word sequence
 */

use karacut::phrase_matcher::{find_phrase_matches, tag_phrase_matches};
use karacut::text_normalizer::normalize_phrase;
use crate::common;

/// Test that a phrase is found regardless of case and punctuation
#[test]
fn test_findPhraseMatches_withCaseAndPunctuationDifferences_shouldMatch() {
    let clip = common::clip_with_line("Happy BIRTHDAY, dear friend");
    let phrase = normalize_phrase("happy birthday");

    let matches = find_phrase_matches(&clip, &phrase);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].start_word, 0);
    assert_eq!(matches[0].end_word, 2);
    assert_eq!(matches[0].start_time_ms, 1_000);
    assert_eq!(matches[0].end_time_ms, 2_000);
}

/// Test that a phrase spanning a cue boundary still matches
#[test]
fn test_findPhraseMatches_withPhraseAcrossCues_shouldMatch() {
    let mut content = common::word_sync_line(1, "the quick", 1_000, 400);
    content.push_str(&common::word_sync_line(3, "brown fox", 3_000, 400));
    let clip = common::clip_from_srt(&content);

    let phrase = normalize_phrase("quick brown");
    let matches = find_phrase_matches(&clip, &phrase);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].start_word, 1);
    assert_eq!(matches[0].end_word, 3);
}

/// Test that matching is greedy and never overlaps
#[test]
fn test_findPhraseMatches_withOverlappingOccurrences_shouldNotOverlap() {
    let clip = common::clip_with_line("ha ha ha");
    let phrase = normalize_phrase("ha ha");

    let matches = find_phrase_matches(&clip, &phrase);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].start_word, 0);
    assert_eq!(matches[0].end_word, 2);
}

/// Test that multiple disjoint occurrences are all found
#[test]
fn test_findPhraseMatches_withRepeatedPhrase_shouldFindEachOccurrence() {
    let clip = common::clip_with_line("go home now and go home");
    let phrase = normalize_phrase("go home");

    let matches = find_phrase_matches(&clip, &phrase);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].start_word, 0);
    assert_eq!(matches[1].start_word, 4);
}

/// Test that a clip without the phrase yields no matches, not an error
#[test]
fn test_findPhraseMatches_withAbsentPhrase_shouldReturnEmpty() {
    let clip = common::clip_with_line("nothing to see here");
    let phrase = normalize_phrase("happy birthday");

    assert!(find_phrase_matches(&clip, &phrase).is_empty());
}

/// Test that an empty phrase yields no matches
#[test]
fn test_findPhraseMatches_withEmptyPhrase_shouldReturnEmpty() {
    let clip = common::clip_with_line("some words here");
    assert!(find_phrase_matches(&clip, &[]).is_empty());
}

/// Test that tagging sets the flag on matched words only
#[test]
fn test_tagPhraseMatches_withOneMatch_shouldFlagCoveredWordsOnly() {
    let mut clip = common::clip_with_line("happy birthday dear friend");
    let phrase = normalize_phrase("birthday dear");

    let matches = find_phrase_matches(&clip, &phrase);
    tag_phrase_matches(&mut clip, &matches);

    let flags: Vec<bool> = clip.words().map(|w| w.in_phrase).collect();
    assert_eq!(flags, vec![false, true, true, false]);
}

/// Test that tagging with no matches leaves every word untouched
#[test]
fn test_tagPhraseMatches_withNoMatches_shouldLeaveWordsUntouched() {
    let mut clip = common::clip_with_line("just some words");
    tag_phrase_matches(&mut clip, &[]);

    assert!(clip.words().all(|w| !w.in_phrase));
}

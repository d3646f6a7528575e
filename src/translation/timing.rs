/*!
 * Timing reconciliation for translated cue text.
 *
 * Translation rarely preserves word count, but the karaoke grid must keep
 * playing on the cue's original time slots. When token counts match, times
 * transfer one-to-one. When they differ, the translated tokens are laid out
 * across the cue's full span, each slot sized by the token's character
 * length, with no gaps and no overlaps.
 */

use crate::subtitle_extractor::{Cue, Word};

/// How translated tokens were fitted onto the cue's timing grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStrategy {
    /// Token count matched the original words, times reused one-to-one
    OneToOne,
    /// Token count differed, tokens distributed across the cue span
    Proportional,
}

/// Translated text for one cue, mapped onto its original timing grid.
///
/// Produced and consumed within a single run, never persisted.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Index of the cue within its clip
    pub cue_index: usize,

    /// Full translated line
    pub translated_text: String,

    /// Translated words carrying the reconciled timing grid
    pub words: Vec<Word>,

    /// Which reconciliation path produced the grid
    pub strategy: ReconciliationStrategy,
}

/// Fit translated text onto the cue's timing grid.
///
/// Returns `None` when the translated text has no tokens, or when the cue
/// span is too short to give every token a non-empty slot; the caller then
/// degrades the cue to its original text.
pub fn reconcile_cue(cue: &Cue, cue_index: usize, translated_text: &str) -> Option<TranslationResult> {
    let tokens: Vec<&str> = translated_text.split_whitespace().collect();
    if tokens.is_empty() || cue.words.is_empty() {
        return None;
    }

    if tokens.len() == cue.words.len() {
        let words = tokens
            .iter()
            .zip(cue.words.iter())
            .map(|(token, original)| {
                let mut word = Word::new(token, original.start_time_ms, original.end_time_ms);
                word.in_phrase = original.in_phrase;
                word
            })
            .collect();

        return Some(TranslationResult {
            cue_index,
            translated_text: translated_text.to_string(),
            words,
            strategy: ReconciliationStrategy::OneToOne,
        });
    }

    let words = distribute_tokens(cue, &tokens)?;
    Some(TranslationResult {
        cue_index,
        translated_text: translated_text.to_string(),
        words,
        strategy: ReconciliationStrategy::Proportional,
    })
}

/// Lay out `tokens` contiguously over the cue span, slot widths proportional
/// to token character length, every slot at least 1ms wide.
fn distribute_tokens(cue: &Cue, tokens: &[&str]) -> Option<Vec<Word>> {
    let token_count = tokens.len() as u64;
    let span = cue.end_time_ms - cue.start_time_ms;
    if span < token_count {
        return None;
    }

    let char_counts: Vec<u64> = tokens
        .iter()
        .map(|token| (token.chars().count() as u64).max(1))
        .collect();
    let total_chars: u64 = char_counts.iter().sum();

    // Slot boundaries from character prefix sums, floored to ms
    let count = tokens.len();
    let mut bounds = vec![0u64; count + 1];
    let mut prefix = 0u64;
    for (j, chars) in char_counts.iter().enumerate().take(count - 1) {
        prefix += chars;
        bounds[j + 1] = span * prefix / total_chars;
    }
    bounds[count] = span;

    // Flooring can collapse neighboring boundaries on short cues. A forward
    // sweep guarantees each slot 1ms, a backward clamp keeps the grid inside
    // the span; span >= token_count makes both possible at once.
    for j in 1..=count {
        bounds[j] = bounds[j].max(bounds[j - 1] + 1);
    }
    for j in 1..=count {
        bounds[j] = bounds[j].min(span - (count as u64 - j as u64));
    }

    let original_count = cue.words.len();
    let words = tokens
        .iter()
        .enumerate()
        .map(|(j, token)| {
            let mut word = Word::new(
                token,
                cue.start_time_ms + bounds[j],
                cue.start_time_ms + bounds[j + 1],
            );
            // Highlight flags carry over by relative position; phrase
            // semantics do not survive translation, so no re-matching
            let source_index = j * original_count / count;
            word.in_phrase = cue.words[source_index].in_phrase;
            word
        })
        .collect();

    Some(words)
}

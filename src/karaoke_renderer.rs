/*!
 * Karaoke rendering of timed words.
 *
 * Turns a clip's cues into a flat, time-ordered sequence of render
 * instructions, one per word. When a cue has a reconciled translation the
 * translated words replace the originals, so the karaoke line follows the
 * target language on the original timing grid.
 */

use crate::subtitle_extractor::{Cue, Word};
use crate::translation::CueTranslation;

/// Visual state of a word during its time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    /// Outside its spoken window a word renders in the base presentation
    Normal,

    /// The word is being spoken during this window
    Spoken,

    /// The word belongs to the matched phrase and keeps its accent color
    Phrase,
}

/// One timed directive for the subtitle overlay.
///
/// The instruction's span is the word's spoken window; the state tells the
/// overlay how to present the word inside that window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    /// Index of the cue this word belongs to
    pub cue_index: usize,

    /// Display text of the word
    pub text: String,

    /// Window start in clip-local milliseconds
    pub start_time_ms: u64,

    /// Window end in clip-local milliseconds
    pub end_time_ms: u64,

    /// Highlight state during the window
    pub state: HighlightState,
}

/// Render one clip's cues into time-ordered instructions.
///
/// Pass the cue translations to render the translated words instead of the
/// originals; degraded cues keep their original words. Output order follows
/// cue order then word order, which is non-decreasing in start time because
/// cues do not overlap and words within a cue are time-ordered.
pub fn render_clip(
    cues: &[Cue],
    translations: Option<&[CueTranslation]>,
) -> Vec<RenderInstruction> {
    let mut instructions = Vec::new();

    for (cue_index, cue) in cues.iter().enumerate() {
        let translation = translations.and_then(|t| t.get(cue_index));

        for word in active_words(cue, translation) {
            instructions.push(RenderInstruction {
                cue_index,
                text: word.text.clone(),
                start_time_ms: word.start_time_ms,
                end_time_ms: word.end_time_ms,
                state: if word.in_phrase {
                    HighlightState::Phrase
                } else {
                    HighlightState::Spoken
                },
            });
        }
    }

    instructions
}

/// The words the overlay should show for a cue
fn active_words<'a>(cue: &'a Cue, translation: Option<&'a CueTranslation>) -> &'a [Word] {
    match translation {
        Some(CueTranslation::Translated(result)) => &result.words,
        _ => &cue.words,
    }
}

/*!
 * Contiguous phrase matching over a clip's word sequence.
 *
 * Matching works on the normalized token stream of one clip, concatenated
 * across its cues in time order. A phrase can therefore span cue boundaries,
 * but never clip boundaries. Matches are found left to right and never
 * overlap; the scan resumes past the end of each match.
 */

use crate::subtitle_extractor::ClipSubtitles;

/// One contiguous run of words matching the target phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Index of the first matched word in the clip's word sequence
    pub start_word: usize,

    /// Index one past the last matched word
    pub end_word: usize,

    /// Start time of the first matched word in ms
    pub start_time_ms: u64,

    /// End time of the last matched word in ms
    pub end_time_ms: u64,
}

impl PhraseMatch {
    /// Number of words covered by the match
    pub fn len(&self) -> usize {
        self.end_word - self.start_word
    }

    pub fn is_empty(&self) -> bool {
        self.end_word == self.start_word
    }
}

/// Find all non-overlapping occurrences of the phrase in the clip.
///
/// `phrase_tokens` must already be normalized. An empty phrase yields no
/// matches; a clip where the phrase never occurs yields an empty vec, which
/// is a legal outcome, not an error.
pub fn find_phrase_matches(clip: &ClipSubtitles, phrase_tokens: &[String]) -> Vec<PhraseMatch> {
    if phrase_tokens.is_empty() {
        return Vec::new();
    }

    let words: Vec<_> = clip.words().collect();
    if words.len() < phrase_tokens.len() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut position = 0;
    while position + phrase_tokens.len() <= words.len() {
        let aligned = phrase_tokens
            .iter()
            .enumerate()
            .all(|(offset, token)| words[position + offset].normalized == *token);

        if aligned {
            let end_word = position + phrase_tokens.len();
            matches.push(PhraseMatch {
                start_word: position,
                end_word,
                start_time_ms: words[position].start_time_ms,
                end_time_ms: words[end_word - 1].end_time_ms,
            });
            // Greedy: continue past the match, never inside it
            position = end_word;
        } else {
            position += 1;
        }
    }

    matches
}

/// Set the phrase highlight flag on every word covered by a match
pub fn tag_phrase_matches(clip: &mut ClipSubtitles, matches: &[PhraseMatch]) {
    if matches.is_empty() {
        return;
    }

    for (index, word) in clip.words_mut().enumerate() {
        if matches.iter().any(|m| index >= m.start_word && index < m.end_word) {
            word.in_phrase = true;
        }
    }
}

/*!
 * Common-phrase inference across all clips of a run.
 *
 * When the caller supplies no phrase, the run highlights the longest token
 * run that occurs contiguously in every clip's normalized word sequence.
 * Candidate runs are enumerated from the first clip in filename order
 * (any run common to all clips occurs there), longest first, then by
 * earliest offset, making the selection deterministic.
 */

use log::debug;

use crate::subtitle_extractor::ClipSubtitles;
use crate::text_normalizer;

/// The phrase driving highlight tagging for a run.
///
/// The absence of a phrase is an explicit outcome, distinct from "nothing
/// was provided": `None` means inference ran and found no shared run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseSelection {
    /// Caller-specified phrase, normalized tokens
    Explicit(Vec<String>),

    /// Longest run shared by every clip, normalized tokens
    Inferred(Vec<String>),

    /// No phrase supplied and no common run exists across the clips
    None,
}

impl PhraseSelection {
    /// The normalized tokens to match, when a phrase exists
    pub fn tokens(&self) -> Option<&[String]> {
        match self {
            PhraseSelection::Explicit(tokens) | PhraseSelection::Inferred(tokens) => {
                Some(tokens.as_slice())
            }
            PhraseSelection::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PhraseSelection::None)
    }

    /// Human-readable form for logs and the run report
    pub fn describe(&self) -> String {
        match self {
            PhraseSelection::Explicit(tokens) => format!("explicit phrase '{}'", tokens.join(" ")),
            PhraseSelection::Inferred(tokens) => format!("inferred phrase '{}'", tokens.join(" ")),
            PhraseSelection::None => "no common phrase".to_string(),
        }
    }
}

/// Resolve the phrase for a run: the explicit phrase when one is given,
/// otherwise the longest common run across `clips` (filename order).
pub fn select_phrase(explicit: Option<&str>, clips: &[&ClipSubtitles]) -> PhraseSelection {
    if let Some(phrase) = explicit {
        let tokens = text_normalizer::normalize_phrase(phrase);
        if !tokens.is_empty() {
            return PhraseSelection::Explicit(tokens);
        }
        debug!("Explicit phrase '{}' normalized to nothing, falling back to inference", phrase);
    }

    let sequences: Vec<Vec<String>> = clips.iter().map(|clip| clip.normalized_words()).collect();
    match longest_common_run(&sequences) {
        Some(tokens) => PhraseSelection::Inferred(tokens),
        None => PhraseSelection::None,
    }
}

/// Longest token run contiguous in every sequence.
///
/// Ties on length resolve to the run whose first occurrence is earliest:
/// all candidates occur in the first sequence, so the earliest start offset
/// there wins. Returns `None` when the sequences share no run of length 1.
pub fn longest_common_run(sequences: &[Vec<String>]) -> Option<Vec<String>> {
    let first = sequences.first()?;
    if sequences.iter().any(|seq| seq.is_empty()) {
        return None;
    }

    for length in (1..=first.len()).rev() {
        for start in 0..=(first.len() - length) {
            let candidate = &first[start..start + length];

            // Punctuation-only tokens normalize to nothing and cannot anchor
            // a phrase
            if candidate.iter().any(|token| token.is_empty()) {
                continue;
            }

            if sequences[1..].iter().all(|seq| contains_run(seq, candidate)) {
                return Some(candidate.to_vec());
            }
        }
    }

    None
}

/// Whether `run` occurs contiguously inside `sequence`
fn contains_run(sequence: &[String], run: &[String]) -> bool {
    if run.is_empty() || sequence.len() < run.len() {
        return false;
    }
    sequence
        .windows(run.len())
        .any(|window| window == run)
}

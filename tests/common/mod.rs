/*!
 * Common test utilities for the karacut test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use karacut::subtitle_extractor::{ClipSubtitles, Cue, Word};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn srt_timestamp(ms: u64) -> String {
    Cue::format_timestamp(ms)
}

/// Build word-sync SRT entries for one line: the full line repeated once per
/// word with the active word wrapped in `<u>…</u>`, each entry's time window
/// being that word's window. Returns the entries followed by a blank line.
pub fn word_sync_line(seq_start: usize, text: &str, start_ms: u64, word_duration_ms: u64) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out = String::new();

    for (i, _) in words.iter().enumerate() {
        let word_start = start_ms + i as u64 * word_duration_ms;
        let word_end = word_start + word_duration_ms;

        out.push_str(&format!(
            "{}\n{} --> {}\n",
            seq_start + i,
            srt_timestamp(word_start),
            srt_timestamp(word_end)
        ));

        let marked: Vec<String> = words
            .iter()
            .enumerate()
            .map(|(j, word)| {
                if i == j {
                    format!("<u>{}</u>", word)
                } else {
                    word.to_string()
                }
            })
            .collect();
        out.push_str(&marked.join(" "));
        out.push_str("\n\n");
    }

    out
}

/// Parse word-sync SRT content into clip subtitles rooted at a synthetic path
pub fn clip_from_srt(content: &str) -> ClipSubtitles {
    ClipSubtitles::parse_srt_string(content, Path::new("test_clip.mp4"))
        .expect("test SRT content should parse")
}

/// Build a one-line clip with evenly spaced word windows of 500ms from 1s
pub fn clip_with_line(text: &str) -> ClipSubtitles {
    clip_from_srt(&word_sync_line(1, text, 1_000, 500))
}

/// Build one cue with evenly spaced word windows
pub fn make_cue(seq_num: usize, text: &str, start_ms: u64, word_duration_ms: u64) -> Cue {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let words: Vec<Word> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let word_start = start_ms + i as u64 * word_duration_ms;
            Word::new(token, word_start, word_start + word_duration_ms)
        })
        .collect();
    let end_ms = start_ms + tokens.len() as u64 * word_duration_ms;

    Cue::new_validated(seq_num, start_ms, end_ms, text.to_string(), words)
        .expect("test cue should validate")
}

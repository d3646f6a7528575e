use std::fs;
use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use log::{error, warn};
use tokio::process::Command;

use crate::errors::SubtitleError;
use crate::text_normalizer;

// @module: Word-timed subtitle extraction and parsing

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @const: Word-sync marker, one per entry in the source dialect
static UNDERLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?u>").unwrap()
});

// @struct: One timed token of a cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    // @field: Original text as displayed
    pub text: String,

    // @field: Canonical form used for matching
    pub normalized: String,

    // @field: Start time in ms, clip-local
    pub start_time_ms: u64,

    // @field: End time in ms, clip-local
    pub end_time_ms: u64,

    // @field: Set when the word belongs to a phrase match
    pub in_phrase: bool,
}

impl Word {
    pub fn new(text: &str, start_time_ms: u64, end_time_ms: u64) -> Self {
        Word {
            text: text.to_string(),
            normalized: text_normalizer::normalize_word(text),
            start_time_ms,
            end_time_ms,
            in_phrase: false,
        }
    }
}

// @struct: One subtitle line with its word timing grid
#[derive(Debug, Clone)]
pub struct Cue {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Display text of the whole line
    pub text: String,

    // @field: Timed words, ordered and non-overlapping
    pub words: Vec<Word>,
}

impl Cue {
    // @creates: Validated cue
    // @validates: Time range, non-empty text, word grid invariants
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
        words: Vec<Word>,
    ) -> Result<Self, SubtitleError> {
        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::Malformed(format!(
                "cue {}: end time {} <= start time {}",
                seq_num, end_time_ms, start_time_ms
            )));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(SubtitleError::Malformed(format!(
                "cue {}: empty display text",
                seq_num
            )));
        }

        for (i, word) in words.iter().enumerate() {
            if word.end_time_ms <= word.start_time_ms {
                return Err(SubtitleError::Malformed(format!(
                    "cue {}: word '{}' has a zero-length time span",
                    seq_num, word.text
                )));
            }
            if word.start_time_ms < start_time_ms || word.end_time_ms > end_time_ms {
                return Err(SubtitleError::Malformed(format!(
                    "cue {}: word '{}' lies outside the cue span",
                    seq_num, word.text
                )));
            }
            if i > 0 && words[i - 1].end_time_ms > word.start_time_ms {
                return Err(SubtitleError::Malformed(format!(
                    "cue {}: words '{}' and '{}' overlap",
                    seq_num,
                    words[i - 1].text,
                    word.text
                )));
            }
        }

        Ok(Cue {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
            words,
        })
    }

    /// Parse an SRT timestamp to milliseconds - used by tests
    #[allow(dead_code)]
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(SubtitleError::Malformed(format!(
                "invalid timestamp format: {}",
                timestamp
            )));
        }

        let mut components = [0u64; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part.parse().map_err(|_| {
                SubtitleError::Malformed(format!("invalid timestamp component: {}", part))
            })?;
        }
        let [hours, minutes, seconds, millis] = components;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::Malformed(format!(
                "invalid time components in timestamp: {}",
                timestamp
            )));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

// One raw SRT entry before word-sync assembly
#[derive(Debug, Clone)]
struct RawEntry {
    seq_num: usize,
    start_time_ms: u64,
    end_time_ms: u64,
    text: String,
}

/// Word-timed cues extracted from one clip
#[derive(Debug)]
pub struct ClipSubtitles {
    /// The clip the track came from
    pub source_file: PathBuf,

    /// Time-ordered cues
    pub cues: Vec<Cue>,

    /// Non-fatal oddities found while parsing, for the run report
    pub warnings: Vec<String>,
}

impl ClipSubtitles {
    /// Extract the first embedded subtitle track from a clip and parse it
    /// into word-timed cues. The raw SRT stream lands at `srt_output_path`.
    pub async fn extract_from_clip<P: AsRef<Path>>(
        video_path: P,
        srt_output_path: P,
    ) -> Result<Self, SubtitleError> {
        let video_path = video_path.as_ref();
        let srt_output_path = srt_output_path.as_ref();

        if !video_path.exists() {
            return Err(SubtitleError::ExtractionFailed(format!(
                "video file does not exist: {}",
                video_path.display()
            )));
        }

        // Use ffmpeg to demux the first subtitle stream directly to an SRT file.
        // Add timeout to prevent hanging on problematic files.
        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",                       // Overwrite existing file
                "-loglevel", "error",
                "-i", video_path.to_str().unwrap_or_default(),
                "-map", "0:s:0?",           // First subtitle stream, if any
                "-c:s", "srt",              // SRT output format
                srt_output_path.to_str().unwrap_or_default()
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(120); // 2 minute timeout for ffmpeg
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| SubtitleError::ExtractionFailed(format!(
                    "failed to execute ffmpeg for subtitle extraction: {}", e
                )))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(SubtitleError::ExtractionFailed(
                    "ffmpeg command timed out after 2 minutes".to_string()
                ));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            // An input with no subtitle stream maps nothing into the output
            if filtered.contains("does not contain any stream") {
                return Err(SubtitleError::MissingTrack(video_path.display().to_string()));
            }
            error!("Subtitle extraction failed: {}", filtered);
            return Err(SubtitleError::ExtractionFailed(filtered));
        }

        let file_size = fs::metadata(srt_output_path)
            .map(|m| m.len())
            .unwrap_or(0);
        if file_size == 0 {
            return Err(SubtitleError::MissingTrack(video_path.display().to_string()));
        }

        let content = fs::read_to_string(srt_output_path).map_err(|e| {
            SubtitleError::ExtractionFailed(format!("failed to read extracted track: {}", e))
        })?;

        Self::parse_srt_string(&content, video_path)
    }

    /// Parse word-sync SRT content into validated cues.
    ///
    /// The source dialect repeats the full line text once per spoken word,
    /// wrapping the active word in `<u>…</u>`; each entry's time window is
    /// that word's window. Consecutive entries for the same line become one
    /// cue carrying the per-word timing grid.
    pub fn parse_srt_string(content: &str, source_file: &Path) -> Result<Self, SubtitleError> {
        let raw_entries = Self::parse_raw_entries(content)?;

        let mut warnings = Vec::new();
        let cues = Self::assemble_cues(raw_entries, &mut warnings)?;

        if cues.is_empty() {
            return Err(SubtitleError::Malformed(
                "no word-synced subtitle entries found in track".to_string(),
            ));
        }

        Ok(ClipSubtitles {
            source_file: source_file.to_path_buf(),
            cues,
            warnings,
        })
    }

    /// All words of the clip in time order, across cue boundaries
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.cues.iter().flat_map(|cue| cue.words.iter())
    }

    /// Mutable view of the clip's word sequence, same order as `words`
    pub fn words_mut(&mut self) -> impl Iterator<Item = &mut Word> {
        self.cues.iter_mut().flat_map(|cue| cue.words.iter_mut())
    }

    /// Number of words across all cues
    pub fn word_count(&self) -> usize {
        self.cues.iter().map(|cue| cue.words.len()).sum()
    }

    /// Normalized token stream of the clip, used by matching and inference
    pub fn normalized_words(&self) -> Vec<String> {
        self.words().map(|word| word.normalized.clone()).collect()
    }

    /// Parse SRT format string into raw entries
    fn parse_raw_entries(content: &str) -> Result<Vec<RawEntry>, SubtitleError> {
        let mut entries: Vec<RawEntry> = Vec::new();
        let lines = content.lines();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_start_time_ms: Option<u64> = None;
        let mut current_end_time_ms: Option<u64> = None;
        let mut current_text = String::new();
        let mut line_count = 0;

        // Helper function to add the current entry if complete
        let mut add_current_entry = |seq_num: usize, start_ms: u64, end_ms: u64, text: &str| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                warn!("Skipping empty subtitle entry {}", seq_num);
                return;
            }
            if end_ms <= start_ms {
                warn!(
                    "Skipping subtitle entry {} with invalid time range {} --> {}",
                    seq_num, start_ms, end_ms
                );
                return;
            }
            entries.push(RawEntry {
                seq_num,
                start_time_ms: start_ms,
                end_time_ms: end_ms,
                text: trimmed.to_string(),
            });
        };

        for line in lines {
            line_count += 1;
            let trimmed = line.trim();

            // Skip empty lines, but check if we need to finalize the current entry
            if trimmed.is_empty() {
                if let (Some(seq_num), Some(start_ms), Some(end_ms)) =
                    (current_seq_num, current_start_time_ms, current_end_time_ms)
                {
                    if !current_text.is_empty() {
                        add_current_entry(seq_num, start_ms, end_ms, &current_text);

                        // Reset state for next entry
                        current_seq_num = None;
                        current_start_time_ms = None;
                        current_end_time_ms = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            // Try to parse as sequence number (only if we're starting a new entry)
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            // Try to parse as timestamp
            if current_seq_num.is_some()
                && current_start_time_ms.is_none()
                && current_end_time_ms.is_none()
            {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    match (Self::parse_timestamp_to_ms(&caps, 1), Self::parse_timestamp_to_ms(&caps, 5)) {
                        (Ok(start_ms), Ok(end_ms)) => {
                            current_start_time_ms = Some(start_ms);
                            current_end_time_ms = Some(end_ms);
                            continue;
                        },
                        _ => {
                            // Invalid timestamp format, but we'll treat it as text
                            warn!("Invalid timestamp format at line {}: {}", line_count, trimmed);
                        }
                    }
                }
            }

            // If we have a sequence number and timestamps, this must be subtitle text
            if current_seq_num.is_some() && current_start_time_ms.is_some() && current_end_time_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push(' ');
                }
                current_text.push_str(trimmed);
            } else {
                // We have text but no sequence number or timestamps yet
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_count, trimmed);
            }
        }

        // Add the last entry if there is one
        if let (Some(seq_num), Some(start_ms), Some(end_ms)) =
            (current_seq_num, current_start_time_ms, current_end_time_ms)
        {
            if !current_text.is_empty() {
                add_current_entry(seq_num, start_ms, end_ms, &current_text);
            }
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(SubtitleError::Malformed(
                "no valid subtitle entries were found in the SRT content".to_string(),
            ));
        }

        // Sort by start time to ensure correct order
        entries.sort_by_key(|entry| entry.start_time_ms);

        Ok(entries)
    }

    /// Group raw word-sync entries into cues with word timing grids
    fn assemble_cues(
        raw_entries: Vec<RawEntry>,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Cue>, SubtitleError> {
        // Entries without a word marker carry no timing information
        let (marked, unmarked): (Vec<RawEntry>, Vec<RawEntry>) = raw_entries
            .into_iter()
            .partition(|entry| entry.text.contains("<u>"));

        if !unmarked.is_empty() {
            warnings.push(format!(
                "{} subtitle entries without word markers were ignored",
                unmarked.len()
            ));
        }

        // Group consecutive entries that repeat the same line. A group break
        // also happens when the marked word position jumps backwards, which
        // means the line restarted.
        let mut groups: Vec<Vec<RawEntry>> = Vec::new();
        let mut last_key: Option<(String, usize)> = None;
        for entry in marked {
            let clean = Self::strip_word_markers(&entry.text);
            let key = text_normalizer::normalize_phrase(&clean).join(" ");
            let marker_pos = Self::marked_token_index(&entry.text).unwrap_or(0);

            let same_group = match &last_key {
                Some((prev_key, prev_pos)) => *prev_key == key && marker_pos > *prev_pos,
                None => false,
            };
            if same_group {
                if let Some(group) = groups.last_mut() {
                    group.push(entry);
                }
            } else {
                groups.push(vec![entry]);
            }
            last_key = Some((key, marker_pos));
        }

        let mut cues = Vec::new();
        for group in groups {
            match Self::cue_from_group(&group, warnings) {
                Ok(Some(cue)) => cues.push(cue),
                Ok(None) => {}
                Err(e) => return Err(e),
            }
        }

        // Sort by start time and check for overlapping cues
        cues.sort_by_key(|cue| cue.start_time_ms);

        let mut overlap_count = 0;
        for i in 0..cues.len().saturating_sub(1) {
            if cues[i].end_time_ms > cues[i + 1].start_time_ms {
                overlap_count += 1;
            }
        }
        if overlap_count > 0 {
            warnings.push(format!("{} overlapping cues in track", overlap_count));
        }

        // Renumber to ensure sequential order
        for (i, cue) in cues.iter_mut().enumerate() {
            cue.seq_num = i + 1;
        }

        Ok(cues)
    }

    /// Build one cue from a group of entries sharing the same line text
    fn cue_from_group(
        group: &[RawEntry],
        warnings: &mut Vec<String>,
    ) -> Result<Option<Cue>, SubtitleError> {
        let last = match group.last() {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let display_text = Self::strip_word_markers(&last.text);
        let tokens: Vec<&str> = display_text.split_whitespace().collect();
        if tokens.is_empty() {
            warnings.push(format!(
                "entry {} has no text after removing word markers",
                last.seq_num
            ));
            return Ok(None);
        }

        // Pair token i with entry i's window; mismatched counts pair up to
        // the shorter side
        let paired = tokens.len().min(group.len());
        if tokens.len() != group.len() {
            warnings.push(format!(
                "line '{}' has {} words but {} timing entries, pairing the first {}",
                display_text,
                tokens.len(),
                group.len(),
                paired
            ));
        }

        let mut words = Vec::with_capacity(paired);
        for i in 0..paired {
            let entry = &group[i];

            // The marked word should sit at this token position
            if let Some(marked) = Self::marked_word(&entry.text) {
                let expected = text_normalizer::normalize_word(tokens[i]);
                if text_normalizer::normalize_word(&marked) != expected {
                    warnings.push(format!(
                        "entry {}: marked word '{}' does not match token '{}'",
                        entry.seq_num, marked, tokens[i]
                    ));
                }
            }

            // Clamp against the next entry so word windows never overlap
            let mut end_ms = entry.end_time_ms;
            if i + 1 < paired {
                end_ms = end_ms.min(group[i + 1].start_time_ms);
            }
            if end_ms <= entry.start_time_ms {
                return Err(SubtitleError::Malformed(format!(
                    "entry {}: word '{}' left with a zero-length span after clamping",
                    entry.seq_num, tokens[i]
                )));
            }

            words.push(Word::new(tokens[i], entry.start_time_ms, end_ms));
        }

        let start_ms = group[0].start_time_ms;
        let end_ms = group.iter().map(|e| e.end_time_ms).max().unwrap_or(last.end_time_ms);

        Cue::new_validated(last.seq_num, start_ms, end_ms, display_text, words).map(Some)
    }

    /// Remove `<u>` word markers, leaving the plain line text
    fn strip_word_markers(text: &str) -> String {
        UNDERLINE_REGEX.replace_all(text, "").to_string()
    }

    /// Token position of the marked word within the entry text
    fn marked_token_index(text: &str) -> Option<usize> {
        text.split_whitespace().position(|token| token.contains("<u>"))
    }

    /// The marked word itself, markers stripped
    fn marked_word(text: &str) -> Option<String> {
        text.split_whitespace()
            .find(|token| token.contains("<u>"))
            .map(|token| UNDERLINE_REGEX.replace_all(token, "").to_string())
    }

    /// Parse timestamp to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Result<u64, SubtitleError> {
        let hours: u64 = caps.get(start_idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let minutes: u64 = caps.get(start_idx + 1)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let seconds: u64 = caps.get(start_idx + 2)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let millis: u64 = caps.get(start_idx + 3)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));

        Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
    }
}

impl fmt::Display for ClipSubtitles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Clip subtitles")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        writeln!(f, "Words: {}", self.word_count())?;
        Ok(())
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub(crate) fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            if line.trim().is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

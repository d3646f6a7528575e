/*!
 * Explicit run state threaded through the pipeline.
 *
 * Accumulated warnings, per-clip outcomes and translation usage live in a
 * value the controller passes into and out of each stage; nothing in the
 * pipeline keeps ambient mutable state. At the end of a run the context
 * produces the summary block and, when warnings exist, the issues log file.
 */

use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::phrase_inference::PhraseSelection;
use crate::translation::{CharUsageStats, LogEntry};

/// A clip excluded from the run, with the reason it was dropped
#[derive(Debug, Clone)]
pub struct SkippedClip {
    /// Path of the excluded clip
    pub path: PathBuf,

    /// Why the clip was skipped
    pub reason: String,
}

/// Mutable state of one pipeline run
pub struct RunContext {
    /// The phrase driving highlight tagging, fixed at the inference barrier
    pub phrase: PhraseSelection,

    /// Clips excluded from the run
    pub skipped: Vec<SkippedClip>,

    /// Number of cues that fell back to their original text
    pub degraded_cues: usize,

    /// Warnings and notices collected across all stages
    pub entries: Vec<LogEntry>,

    /// Per-language translation usage, accumulated over all clips
    pub usage: Vec<CharUsageStats>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            phrase: PhraseSelection::None,
            skipped: Vec::new(),
            degraded_cues: 0,
            entries: Vec::new(),
            usage: Vec::new(),
        }
    }

    /// Record a clip excluded from the run
    pub fn skip_clip(&mut self, path: &Path, reason: impl Into<String>) {
        self.skipped.push(SkippedClip {
            path: path.to_path_buf(),
            reason: reason.into(),
        });
    }

    /// Record a non-fatal warning for one clip
    pub fn warn(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: "WARN".to_string(),
            message: message.into(),
        });
    }

    /// Record cues that degraded to their original text
    pub fn add_degraded_cues(&mut self, count: usize) {
        self.degraded_cues += count;
    }

    /// Record translation usage for one rendition
    pub fn add_usage(&mut self, stats: CharUsageStats) {
        self.usage.push(stats);
    }

    /// Whether anything went wrong during the run
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty() || self.degraded_cues > 0 || !self.entries.is_empty()
    }

    /// Final statistics block logged at the end of a run
    pub fn summary(&self, total_clips: usize) -> String {
        format!(
            "Run summary: {} clips found, {} processed, {} skipped, {} degraded cues, phrase: {}",
            total_clips,
            total_clips - self.skipped.len(),
            self.skipped.len(),
            self.degraded_cues,
            self.phrase.describe(),
        )
    }

    /// Write the collected warnings to an issues log next to the output
    pub fn write_issues_log(&self, path: &Path, context: &str) -> anyhow::Result<()> {
        let mut content = String::new();

        content.push_str(&format!(
            "Run Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        content.push_str(&format!("Context: {}\n\n", context));

        // Skipped clips in path order first, then stage warnings in arrival
        // order, numbered continuously
        let mut skipped: Vec<&SkippedClip> = self.skipped.iter().collect();
        skipped.sort_by_key(|clip| clip.path.clone());

        let mut line = 1;
        for clip in skipped {
            content.push_str(&format!(
                "{}. [SKIPPED] {}: {}\n",
                line,
                clip.path.display(),
                clip.reason
            ));
            line += 1;
        }
        for entry in &self.entries {
            content.push_str(&format!("{}. [{}] {}\n", line, entry.level, entry.message));
            line += 1;
        }

        FileManager::write_to_file(path, &content)?;
        Ok(())
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

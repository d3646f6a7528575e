use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// Container formats the clip scan accepts
const CLIP_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "avi", "mov"];

// Filename prefixes of prior outputs, never re-ingested
const OUTPUT_PREFIXES: [&str; 2] = ["output", "processed_"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Find the input clips of a run: video files at the top level of `dir`,
    /// sorted by filename ascending lexicographic. Files named like prior
    /// outputs are skipped so reruns never re-ingest their own results.
    pub fn find_clip_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let has_clip_extension = path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy();
                    CLIP_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c))
                })
                .unwrap_or(false);
            if !has_clip_extension {
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if OUTPUT_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }

            result.push(path.to_path_buf());
        }

        // Lexicographic by filename; callers zero-pad for numeric order
        result.sort_by_key(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(result)
    }

    /// Name of the per-clip burned intermediate in the working area
    pub fn processed_clip_name(input_file: &Path, language: Option<&str>) -> String {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string());
        let sanitized = sanitize_stem(&stem);

        match language {
            Some(lang) => format!("processed_{}_{}.mp4", sanitized, lang),
            None => format!("processed_{}.mp4", sanitized),
        }
    }

    /// Name of the final concatenated montage file
    pub fn final_output_name(video_size: &str, phrase: &str, language: Option<&str>) -> String {
        let slug = phrase_slug(phrase);
        match language {
            Some(lang) => format!("{}-{}-{}.mp4", lang, video_size, slug),
            None => format!("{}-{}.mp4", video_size, slug),
        }
    }
}

/// Lowercased phrase with whitespace collapsed to dashes, restricted to
/// characters safe in a filename
pub fn phrase_slug(phrase: &str) -> String {
    let slug: String = phrase
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '\'' || *c == '-')
        .collect();

    if slug.is_empty() {
        "montage".to_string()
    } else {
        slug
    }
}

/// Keep file stems free of characters that complicate shell and filter use
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

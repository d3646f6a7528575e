/*!
 * Tests for clip discovery and output naming
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use karacut::file_utils::{phrase_slug, FileManager};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "probe.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a/b/c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that write_to_file creates parent directories and read round-trips
#[test]
fn test_write_to_file_withMissingParent_shouldCreateAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("sub/dir/file.txt");

    FileManager::write_to_file(&target, "payload")?;
    assert_eq!(FileManager::read_to_string(&target)?, "payload");
    Ok(())
}

/// Test that clip discovery accepts video extensions case-insensitively and
/// only at the top level
#[test]
fn test_find_clip_files_withMixedContent_shouldFilterAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "b.MKV", "")?;
    common::create_test_file(&dir, "a.mp4", "")?;
    common::create_test_file(&dir, "notes.txt", "")?;
    common::create_test_file(&dir, "c.mov", "")?;

    // Nested files are not clip inputs
    fs::create_dir(dir.join("nested"))?;
    fs::write(dir.join("nested/d.mp4"), "")?;

    let clips = FileManager::find_clip_files(&dir)?;
    let names: Vec<String> = clips
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.mp4", "b.MKV", "c.mov"]);
    Ok(())
}

/// Test that files named like prior outputs are never re-ingested
#[test]
fn test_find_clip_files_withPriorOutputs_shouldSkipThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "clip1.mp4", "")?;
    common::create_test_file(&dir, "processed_clip1.mp4", "")?;
    common::create_test_file(&dir, "output.mp4", "")?;
    common::create_test_file(&dir, "Output_final.mp4", "")?;

    let clips = FileManager::find_clip_files(&dir)?;
    assert_eq!(clips.len(), 1);
    assert!(clips[0].ends_with("clip1.mp4"));
    Ok(())
}

/// Test that discovery sorts lexicographically by filename
#[test]
fn test_find_clip_files_withNumericNames_shouldSortLexicographically() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    for name in ["10.mp4", "2.mp4", "1.mp4"] {
        common::create_test_file(&dir, name, "")?;
    }

    let clips = FileManager::find_clip_files(&dir)?;
    let names: Vec<String> = clips
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["1.mp4", "10.mp4", "2.mp4"]);
    Ok(())
}

/// Test the per-clip intermediate naming with and without a language
#[test]
fn test_processed_clip_name_withAndWithoutLanguage_shouldFormatName() {
    let input = Path::new("/clips/scene 01.mp4");
    assert_eq!(FileManager::processed_clip_name(input, None), "processed_scene_01.mp4");
    assert_eq!(
        FileManager::processed_clip_name(input, Some("fr")),
        "processed_scene_01_fr.mp4"
    );
}

/// Test the final montage naming with and without a language
#[test]
fn test_final_output_name_withAndWithoutLanguage_shouldFormatName() {
    assert_eq!(
        FileManager::final_output_name("640x480", "Happy Birthday", None),
        "640x480-happy-birthday.mp4"
    );
    assert_eq!(
        FileManager::final_output_name("1280x720", "Happy Birthday", Some("fr")),
        "fr-1280x720-happy-birthday.mp4"
    );
}

/// Test phrase slug generation
#[test]
fn test_phrase_slug_withVariousPhrases_shouldProduceSafeSlugs() {
    assert_eq!(phrase_slug("Happy Birthday!"), "happy-birthday");
    assert_eq!(phrase_slug("don't stop"), "don't-stop");
    assert_eq!(phrase_slug("  spaced   out  "), "spaced-out");
    assert_eq!(phrase_slug("!!!"), "montage");
    assert_eq!(phrase_slug(""), "montage");
}

/*!
 * Tests for run state accumulation and the issues log
 */

use std::path::Path;
use anyhow::Result;
use karacut::phrase_inference::PhraseSelection;
use karacut::run_context::RunContext;
use crate::common;

/// Test that a fresh context reports no warnings
#[test]
fn test_newContext_shouldHaveNoWarnings() {
    let ctx = RunContext::new();
    assert!(!ctx.has_warnings());
    assert_eq!(ctx.degraded_cues, 0);
    assert!(ctx.skipped.is_empty());
}

/// Test that skipping a clip records it and flags the run
#[test]
fn test_skipClip_withReason_shouldRecordSkip() {
    let mut ctx = RunContext::new();
    ctx.skip_clip(Path::new("/clips/broken.mp4"), "no subtitle track");

    assert_eq!(ctx.skipped.len(), 1);
    assert_eq!(ctx.skipped[0].reason, "no subtitle track");
    assert!(ctx.has_warnings());
}

/// Test that degraded cue counts accumulate
#[test]
fn test_addDegradedCues_withMultipleCalls_shouldAccumulate() {
    let mut ctx = RunContext::new();
    ctx.add_degraded_cues(2);
    ctx.add_degraded_cues(3);

    assert_eq!(ctx.degraded_cues, 5);
    assert!(ctx.has_warnings());
}

/// Test the summary block contents
#[test]
fn test_summary_withSkipsAndPhrase_shouldReportCounts() {
    let mut ctx = RunContext::new();
    ctx.phrase = PhraseSelection::Inferred(vec!["happy".to_string(), "birthday".to_string()]);
    ctx.skip_clip(Path::new("/clips/bad.mp4"), "unreadable");
    ctx.add_degraded_cues(1);

    let summary = ctx.summary(5);
    assert!(summary.contains("5 clips found"));
    assert!(summary.contains("4 processed"));
    assert!(summary.contains("1 skipped"));
    assert!(summary.contains("1 degraded cues"));
    assert!(summary.contains("inferred phrase 'happy birthday'"));
}

/// Test that the issues log numbers every entry, skips first in path order
#[test]
fn test_writeIssuesLog_withCollectedIssues_shouldNumberAndSortEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.issues.log");

    let mut ctx = RunContext::new();
    ctx.skip_clip(Path::new("/clips/zeta.mp4"), "no subtitle track");
    ctx.skip_clip(Path::new("/clips/alpha.mp4"), "unreadable");
    ctx.warn("cue 3 degraded to original text");

    ctx.write_issues_log(&log_path, "3 clips in /clips")?;

    let content = std::fs::read_to_string(&log_path)?;
    assert!(content.contains("Context: 3 clips in /clips"));
    assert!(content.contains("1. [SKIPPED] /clips/alpha.mp4: unreadable"));
    assert!(content.contains("2. [SKIPPED] /clips/zeta.mp4: no subtitle track"));
    assert!(content.contains("3. [WARN] cue 3 degraded to original text"));
    Ok(())
}

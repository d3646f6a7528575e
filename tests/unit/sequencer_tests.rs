/*!
 * Tests for clip ordering and timeline offsets
 */

use karacut::sequencer::{sequence_clips, total_duration_ms, Clip};

/// Test that ordering is lexicographic by filename, not numeric
#[test]
fn test_sequenceClips_withNumericNames_shouldSortLexicographically() {
    let clips = vec![
        Clip::new("/clips/2.mp4", 1_000),
        Clip::new("/clips/10.mp4", 1_000),
        Clip::new("/clips/1.mp4", 1_000),
    ];

    let sequenced = sequence_clips(clips);
    let names: Vec<&str> = sequenced.iter().map(|s| s.clip.sort_key.as_str()).collect();
    assert_eq!(names, vec!["1.mp4", "10.mp4", "2.mp4"]);
}

/// Test that offsets accumulate clip durations in order
#[test]
fn test_sequenceClips_withVaryingDurations_shouldAccumulateOffsets() {
    let clips = vec![
        Clip::new("/clips/a.mp4", 2_000),
        Clip::new("/clips/b.mp4", 3_500),
        Clip::new("/clips/c.mp4", 1_500),
    ];

    let sequenced = sequence_clips(clips);
    assert_eq!(sequenced[0].offset_ms, 0);
    assert_eq!(sequenced[1].offset_ms, 2_000);
    assert_eq!(sequenced[2].offset_ms, 5_500);
}

/// Test that total duration covers the last clip's end
#[test]
fn test_totalDurationMs_withSequencedClips_shouldSumDurations() {
    let clips = vec![
        Clip::new("/clips/a.mp4", 2_000),
        Clip::new("/clips/b.mp4", 3_000),
    ];
    let sequenced = sequence_clips(clips);
    assert_eq!(total_duration_ms(&sequenced), 5_000);
}

/// Test that an empty clip list has zero total duration
#[test]
fn test_totalDurationMs_withNoClips_shouldReturnZero() {
    assert_eq!(total_duration_ms(&[]), 0);
}

/// Test that the sort key is derived from the filename only
#[test]
fn test_clipNew_withFullPath_shouldUseFilenameAsSortKey() {
    let clip = Clip::new("/some/deep/path/clip_003.mp4", 500);
    assert_eq!(clip.sort_key, "clip_003.mp4");
    assert_eq!(clip.duration_ms, 500);
}

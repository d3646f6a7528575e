/*!
 * Clip ordering for the final montage.
 *
 * Clips are concatenated in ascending lexicographic filename order, and
 * each clip carries a cumulative start offset so downstream consumers know
 * where it lands on the montage timeline.
 */

use std::path::PathBuf;

/// One input video file, discovered at folder scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    /// Full path to the video file
    pub path: PathBuf,

    /// Filename used for ordering
    pub sort_key: String,

    /// Probed duration in milliseconds
    pub duration_ms: u64,
}

impl Clip {
    pub fn new(path: impl Into<PathBuf>, duration_ms: u64) -> Self {
        let path = path.into();
        let sort_key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            sort_key,
            duration_ms,
        }
    }
}

/// A clip with its start position on the montage timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedClip {
    pub clip: Clip,

    /// Milliseconds from montage start to this clip's first frame
    pub offset_ms: u64,
}

/// Order clips by filename and assign cumulative start offsets.
///
/// Ordering is plain lexicographic, not numeric: `10.mp4` sorts before
/// `2.mp4`. Zero-padded names give numeric ordering when that matters.
pub fn sequence_clips(clips: Vec<Clip>) -> Vec<SequencedClip> {
    let mut clips = clips;
    clips.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

    let mut sequenced = Vec::with_capacity(clips.len());
    let mut offset_ms = 0;
    for clip in clips {
        let duration_ms = clip.duration_ms;
        sequenced.push(SequencedClip { clip, offset_ms });
        offset_ms += duration_ms;
    }
    sequenced
}

/// Total montage duration covered by a sequenced clip list
pub fn total_duration_ms(sequenced: &[SequencedClip]) -> u64 {
    sequenced
        .last()
        .map(|entry| entry.offset_ms + entry.clip.duration_ms)
        .unwrap_or(0)
}

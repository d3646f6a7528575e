/*!
 * End-to-end overlay pipeline tests: parse, infer, tag, render, build.
 *
 * These cover everything up to the encoder boundary; the ffmpeg calls
 * themselves are exercised manually against real clips.
 */

use karacut::ass_builder::{build_document, AssSettings};
use karacut::karaoke_renderer::{render_clip, HighlightState};
use karacut::phrase_inference::{select_phrase, PhraseSelection};
use karacut::phrase_matcher::{find_phrase_matches, tag_phrase_matches};
use karacut::sequencer::{sequence_clips, total_duration_ms, Clip};
use crate::common;

/// Test the full overlay path with an inferred phrase across three clips
#[test]
fn test_pipeline_withInferredPhrase_shouldHighlightItInEveryClip() {
    let mut clips = vec![
        common::clip_with_line("they said happy birthday loudly"),
        common::clip_with_line("sing happy birthday again"),
        common::clip_with_line("happy birthday to you"),
    ];

    let refs: Vec<_> = clips.iter().collect();
    let selection = select_phrase(None, &refs);
    assert_eq!(
        selection,
        PhraseSelection::Inferred(vec!["happy".to_string(), "birthday".to_string()])
    );

    let tokens = selection.tokens().unwrap().to_vec();
    for clip in &mut clips {
        let matches = find_phrase_matches(clip, &tokens);
        assert_eq!(matches.len(), 1, "phrase must occur in every clip");
        tag_phrase_matches(clip, &matches);
    }

    for clip in &clips {
        let instructions = render_clip(&clip.cues, None);
        assert_eq!(instructions.len(), clip.word_count());

        let phrase_words: Vec<&str> = instructions
            .iter()
            .filter(|i| i.state == HighlightState::Phrase)
            .map(|i| i.text.as_str())
            .collect();
        assert_eq!(phrase_words, vec!["happy", "birthday"]);

        let doc = build_document(&instructions, &[], &[], &AssSettings::default());
        assert!(doc.contains("{\\c&H0031D1FD}happy"));
        assert!(doc.contains("{\\c&H0031D1FD}birthday"));
    }
}

/// Test that an explicit phrase absent from one clip degrades gracefully
#[test]
fn test_pipeline_withExplicitPhraseMissingInOneClip_shouldStillRender() {
    let mut clip = common::clip_with_line("completely unrelated words");

    let refs = vec![&clip];
    let selection = select_phrase(Some("happy birthday"), &refs);
    let tokens = selection.tokens().unwrap().to_vec();

    let matches = find_phrase_matches(&clip, &tokens);
    assert!(matches.is_empty());
    tag_phrase_matches(&mut clip, &matches);

    let instructions = render_clip(&clip.cues, None);
    assert!(instructions.iter().all(|i| i.state == HighlightState::Spoken));

    let doc = build_document(&instructions, &[], &[], &AssSettings::default());
    assert!(!doc.contains("{\\c&H0031D1FD}"));
}

/// Test that clips without a common run produce the None selection and a
/// watermark-only overlay still builds
#[test]
fn test_pipeline_withNoCommonPhrase_shouldRenderWithoutHighlightAccent() {
    let clips = vec![
        common::clip_with_line("alpha beta"),
        common::clip_with_line("gamma delta"),
    ];

    let refs: Vec<_> = clips.iter().collect();
    let selection = select_phrase(None, &refs);
    assert!(selection.is_none());

    // Rendering proceeds with plain karaoke highlighting only
    let instructions = render_clip(&clips[0].cues, None);
    let doc = build_document(&instructions, &[], &[], &AssSettings::default());
    assert!(doc.contains("playphrase.me"));
    assert!(!doc.contains("{\\c&H0031D1FD}"));
}

/// Test that two runs over identical input yield identical instructions
/// and overlay documents
#[test]
fn test_pipeline_withIdenticalInput_shouldProduceIdenticalOutput() {
    let build = || {
        let mut clips = vec![
            common::clip_with_line("they said happy birthday loudly"),
            common::clip_with_line("sing happy birthday again"),
        ];

        let refs: Vec<_> = clips.iter().collect();
        let selection = select_phrase(None, &refs);
        let tokens = selection.tokens().unwrap().to_vec();
        for clip in &mut clips {
            let matches = find_phrase_matches(clip, &tokens);
            tag_phrase_matches(clip, &matches);
        }

        clips
            .iter()
            .map(|clip| {
                let instructions = render_clip(&clip.cues, None);
                let doc = build_document(&instructions, &[], &[], &AssSettings::default());
                (instructions, doc)
            })
            .collect::<Vec<_>>()
    };

    let first = build();
    let second = build();
    assert_eq!(first, second);
}

/// Test ordering and offsets over a realistic clip folder listing
#[test]
fn test_pipeline_withDiscoveredClips_shouldSequenceByFilename() {
    let clips = vec![
        Clip::new("/clips/03-ending.mp4", 4_000),
        Clip::new("/clips/01-intro.mp4", 2_500),
        Clip::new("/clips/02-middle.mp4", 3_000),
    ];

    let sequenced = sequence_clips(clips);
    let order: Vec<&str> = sequenced.iter().map(|s| s.clip.sort_key.as_str()).collect();
    assert_eq!(order, vec!["01-intro.mp4", "02-middle.mp4", "03-ending.mp4"]);

    assert_eq!(sequenced[1].offset_ms, 2_500);
    assert_eq!(sequenced[2].offset_ms, 5_500);
    assert_eq!(total_duration_ms(&sequenced), 9_500);
}

/*!
 * Tests for ASS overlay document generation
 */

use karacut::ass_builder::{build_document, AssSettings, CueCaption, CueLine};
use karacut::karaoke_renderer::{HighlightState, RenderInstruction};

fn instruction(cue_index: usize, text: &str, start: u64, end: u64, state: HighlightState) -> RenderInstruction {
    RenderInstruction {
        cue_index,
        text: text.to_string(),
        start_time_ms: start,
        end_time_ms: end,
        state,
    }
}

fn sample_instructions() -> Vec<RenderInstruction> {
    vec![
        instruction(0, "happy", 1_000, 1_500, HighlightState::Phrase),
        instruction(0, "birthday", 1_500, 2_000, HighlightState::Phrase),
        instruction(0, "friend", 2_000, 2_500, HighlightState::Spoken),
    ]
}

fn dialogue_count(doc: &str) -> usize {
    doc.lines().filter(|l| l.starts_with("Dialogue:")).count()
}

/// Test that the script header carries the canvas resolution
#[test]
fn test_buildDocument_withDefaultSettings_shouldEmitCanvasResolution() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());

    assert!(doc.contains("[Script Info]"));
    assert!(doc.contains("PlayResX: 640"));
    assert!(doc.contains("PlayResY: 480"));
    assert!(doc.contains("[V4+ Styles]"));
    assert!(doc.contains("[Events]"));
}

/// Test that all four styles are declared
#[test]
fn test_buildDocument_withDefaultSettings_shouldDeclareAllStyles() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());

    for style in ["Base", "Highlight", "Translation", "Website"] {
        assert!(
            doc.contains(&format!("Style: {},", style)),
            "missing style {}",
            style
        );
    }
}

/// Test the dialogue structure: one base line, one highlight per word,
/// one watermark line
#[test]
fn test_buildDocument_withOneCue_shouldEmitExpectedDialogues() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());
    // 1 base + 3 highlights + 1 website
    assert_eq!(dialogue_count(&doc), 5);
}

/// Test that phrase words carry the accent color override in the base line
#[test]
fn test_buildDocument_withPhraseWords_shouldColorThemInBaseLine() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());
    assert!(doc.contains("{\\c&H0031D1FD}happy"));
    // The non-phrase word has no inline override
    assert!(doc.contains("friend"));
    assert!(!doc.contains("{\\c&H0031D1FD}friend"));
}

/// Test that highlight lines reveal only the active word via alpha overrides
#[test]
fn test_buildDocument_withHighlightLines_shouldUseAlphaOverrides() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());
    assert!(doc.contains("{\\alpha&H00&}happy{\\alpha&HFF&}"));
    assert!(doc.contains("{\\alpha&HFF&}birthday"));
}

/// Test that timestamps are formatted with centisecond precision
#[test]
fn test_buildDocument_withKnownTimes_shouldFormatCentiseconds() {
    let doc = build_document(&sample_instructions(), &[], &[], &AssSettings::default());
    assert!(doc.contains("0:00:01.00"));
    assert!(doc.contains("0:00:02.50"));
}

/// Test that a cue caption adds one Translation-style dialogue
#[test]
fn test_buildDocument_withCaption_shouldEmitTranslationDialogue() {
    let captions = vec![CueCaption {
        cue_index: 0,
        start_time_ms: 1_000,
        end_time_ms: 2_500,
        text: "joyeux anniversaire".to_string(),
    }];

    let doc = build_document(&sample_instructions(), &[], &captions, &AssSettings::default());
    assert_eq!(dialogue_count(&doc), 6);
    assert!(doc.contains("Translation,,0,0,0,,{\\q3}joyeux anniversaire"));
}

/// Test that geometry scales with the canvas width
#[test]
fn test_buildDocument_withWiderCanvas_shouldScaleFontSizes() {
    let settings = AssSettings {
        video_width: 1_280,
        video_height: 720,
        ..AssSettings::default()
    };

    let doc = build_document(&sample_instructions(), &[], &[], &settings);
    assert!(doc.contains("PlayResX: 1280"));
    // Base font size 38 doubles at twice the reference width
    assert!(doc.contains("Style: Base,Roboto-Regular,76,"));
}

/// Test that a configured base font size carries into the styles, with the
/// secondary styles keeping their ratio to it
#[test]
fn test_buildDocument_withCustomFontSize_shouldScaleAllStyles() {
    let settings = AssSettings {
        font_size: 50,
        ..AssSettings::default()
    };

    let doc = build_document(&sample_instructions(), &[], &[], &settings);
    assert!(doc.contains("Style: Base,Roboto-Regular,50,"));
    assert!(doc.contains("Style: Highlight,Roboto-Regular,50,"));
    // 24/38 and 20/38 of the base size, rounded
    assert!(doc.contains("Style: Translation,Roboto-Regular,32,"));
    assert!(doc.contains("Style: Website,Roboto-Regular,26,"));
}

/// Test that the base line shows the full cue text when it carries more
/// tokens than timed words
#[test]
fn test_buildDocument_withFewerTimedWordsThanTokens_shouldShowFullBaseLine() {
    let instructions = vec![
        instruction(0, "one", 1_000, 1_500, HighlightState::Phrase),
        instruction(0, "two", 1_500, 2_000, HighlightState::Spoken),
    ];
    let lines = vec![CueLine {
        cue_index: 0,
        text: "one two three".to_string(),
    }];

    let doc = build_document(&instructions, &lines, &[], &AssSettings::default());
    assert!(doc.contains("{\\c&H0031D1FD}one{\\c&H00FFFFFF} two three"));
    // Karaoke dialogues still cover only the timed words
    assert_eq!(dialogue_count(&doc), 4);
}

/// Test that the watermark line uses the configured text
#[test]
fn test_buildDocument_withCustomWebsiteText_shouldEmitIt() {
    let settings = AssSettings {
        website_text: "example.org".to_string(),
        ..AssSettings::default()
    };

    let doc = build_document(&sample_instructions(), &[], &[], &settings);
    assert!(doc.contains("Website,,0,0,0,,example.org"));
}

/// Test that an empty clip still produces a well-formed document
#[test]
fn test_buildDocument_withNoInstructions_shouldStillEmitWatermark() {
    let doc = build_document(&[], &[], &[], &AssSettings::default());
    assert_eq!(dialogue_count(&doc), 1);
    assert!(doc.contains("playphrase.me"));
}

/*!
 * ASS subtitle document generation.
 *
 * Builds the Advanced SubStation Alpha document burned into each clip: a
 * base line with phrase words in an accent color, one highlight dialogue
 * per word window for the karaoke effect, an optional secondary caption
 * per cue and a watermark line.
 */

use crate::karaoke_renderer::{HighlightState, RenderInstruction};

// Overlay geometry is tuned for a 640-wide canvas and scaled up from there.
// Secondary styles keep their size ratio to the base font as it changes.
const DEFAULT_FONT_SIZE: u32 = 38;
const TRANSLATION_FONT_RATIO: f64 = 24.0 / 38.0;
const WEBSITE_FONT_RATIO: f64 = 20.0 / 38.0;

const PHRASE_MARGIN_V: u32 = 80;
const TRANSLATION_MARGIN_V: u32 = 20;
const WEBSITE_MARGIN_V: u32 = 10;
const MARGIN_LR: u32 = 10;
const OUTLINE: u32 = 2;

// ASS alignment: 2 = bottom center, 8 = top center
const PHRASE_ALIGNMENT: u32 = 2;
const TRANSLATION_ALIGNMENT: u32 = 2;
const WEBSITE_ALIGNMENT: u32 = 8;

// Colors are ASS &HAABBGGRR values
const COLOR_BASE: &str = "&H00FFFFFF";
const COLOR_PHRASE: &str = "&H0031D1FD";
const COLOR_SPOKEN: &str = "&H0000FF00";
const COLOR_TRANSPARENT: &str = "&HFF000000";
const COLOR_OUTLINE: &str = "&H00000000";
const COLOR_BACK: &str = "&H64000000";

/// Canvas and font parameters for one rendition
#[derive(Debug, Clone)]
pub struct AssSettings {
    /// Output canvas width in pixels
    pub video_width: u32,

    /// Output canvas height in pixels
    pub video_height: u32,

    /// Font family name used by all styles
    pub font_name: String,

    /// Base font size of the karaoke line at the 640-wide reference canvas
    pub font_size: u32,

    /// Caption shown at the top of the clip for its full subtitled window
    pub website_text: String,
}

impl Default for AssSettings {
    fn default() -> Self {
        Self {
            video_width: 640,
            video_height: 480,
            font_name: "Roboto-Regular".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            website_text: "playphrase.me".to_string(),
        }
    }
}

/// Full display line of one cue, backing the base dialogue.
///
/// The timed words can fall short of the display text when the source track
/// carried fewer timing entries than tokens; the base line still shows the
/// whole text.
#[derive(Debug, Clone)]
pub struct CueLine {
    /// Index of the cue this line belongs to
    pub cue_index: usize,

    /// Full line text
    pub text: String,
}

/// Secondary caption line shown under the karaoke line for one cue
#[derive(Debug, Clone)]
pub struct CueCaption {
    /// Index of the cue this caption belongs to
    pub cue_index: usize,

    /// Caption window start in clip-local milliseconds
    pub start_time_ms: u64,

    /// Caption window end in clip-local milliseconds
    pub end_time_ms: u64,

    /// Caption text
    pub text: String,
}

/// Build the full ASS document for one clip.
///
/// Instructions must arrive grouped by cue in time order, as produced by
/// the renderer. The output is deterministic text generation with no I/O.
pub fn build_document(
    instructions: &[RenderInstruction],
    lines: &[CueLine],
    captions: &[CueCaption],
    settings: &AssSettings,
) -> String {
    let scale = settings.video_width as f64 / 640.0;
    let scaled = |v: u32| (v as f64 * scale).round() as u32;

    let base_font = scaled(settings.font_size);
    let translation_font = (base_font as f64 * TRANSLATION_FONT_RATIO).round() as u32;
    let website_font = (base_font as f64 * WEBSITE_FONT_RATIO).round() as u32;

    let (window_start, window_end) = subtitle_window(instructions, captions);

    let mut doc = String::new();
    doc.push_str("[Script Info]\n");
    doc.push_str("ScriptType: v4.00+\n");
    doc.push_str(&format!("PlayResX: {}\n", settings.video_width));
    doc.push_str(&format!("PlayResY: {}\n", settings.video_height));
    doc.push_str("ScaledBorderAndShadow: yes\n");
    doc.push_str("WrapStyle: 3\n\n");

    doc.push_str("[V4+ Styles]\n");
    doc.push_str(
        "Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,\
         Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,\
         Alignment,MarginL,MarginR,MarginV,Encoding\n",
    );
    doc.push_str(&style_line(
        "Base",
        &settings.font_name,
        base_font,
        COLOR_BASE,
        COLOR_BASE,
        scaled(OUTLINE),
        PHRASE_ALIGNMENT,
        scaled(MARGIN_LR),
        scaled(PHRASE_MARGIN_V),
    ));
    doc.push_str(&style_line(
        "Highlight",
        &settings.font_name,
        base_font,
        COLOR_SPOKEN,
        COLOR_TRANSPARENT,
        scaled(OUTLINE),
        PHRASE_ALIGNMENT,
        scaled(MARGIN_LR),
        scaled(PHRASE_MARGIN_V),
    ));
    doc.push_str(&style_line(
        "Translation",
        &settings.font_name,
        translation_font,
        COLOR_BASE,
        COLOR_BASE,
        scaled(OUTLINE),
        TRANSLATION_ALIGNMENT,
        scaled(MARGIN_LR),
        scaled(TRANSLATION_MARGIN_V),
    ));
    doc.push_str(&style_line(
        "Website",
        &settings.font_name,
        website_font,
        COLOR_BASE,
        COLOR_BASE,
        scaled(OUTLINE),
        WEBSITE_ALIGNMENT,
        scaled(MARGIN_LR),
        scaled(WEBSITE_MARGIN_V),
    ));

    doc.push_str("\n[Events]\n");
    doc.push_str("Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text\n");

    for group in instructions.chunk_by(|a, b| a.cue_index == b.cue_index) {
        let cue_start = group[0].start_time_ms;
        let cue_end = group[group.len() - 1].end_time_ms;

        // Whole line with phrase words in the accent color
        let line_text = lines
            .iter()
            .find(|l| l.cue_index == group[0].cue_index)
            .map(|l| l.text.as_str());
        doc.push_str(&dialogue(0, cue_start, cue_end, "Base", &base_line(group, line_text)));

        // One dialogue per word window, only the active word visible
        for (active, word) in group.iter().enumerate() {
            doc.push_str(&dialogue(
                1,
                word.start_time_ms,
                word.end_time_ms,
                "Highlight",
                &highlight_line(group, active),
            ));
        }

        if let Some(caption) = captions.iter().find(|c| c.cue_index == group[0].cue_index) {
            doc.push_str(&dialogue(
                0,
                caption.start_time_ms,
                caption.end_time_ms,
                "Translation",
                &format!("{{\\q3}}{}", caption.text),
            ));
        }
    }

    doc.push_str(&dialogue(2, window_start, window_end, "Website", &settings.website_text));

    doc
}

/// Bounding window of all timed content, with a short fallback when empty
fn subtitle_window(instructions: &[RenderInstruction], captions: &[CueCaption]) -> (u64, u64) {
    let mut start = u64::MAX;
    let mut end = 0;

    for instruction in instructions {
        start = start.min(instruction.start_time_ms);
        end = end.max(instruction.end_time_ms);
    }
    for caption in captions {
        start = start.min(caption.start_time_ms);
        end = end.max(caption.end_time_ms);
    }

    if start > end { (0, 5_000) } else { (start, end) }
}

fn style_line(
    name: &str,
    font: &str,
    font_size: u32,
    primary: &str,
    secondary: &str,
    outline: u32,
    alignment: u32,
    margin_lr: u32,
    margin_v: u32,
) -> String {
    format!(
        "Style: {},{},{},{},{},{},{},0,0,0,0,100,100,0,0,1,{},0,{},{},{},{},1\n",
        name,
        font,
        font_size,
        primary,
        secondary,
        COLOR_OUTLINE,
        COLOR_BACK,
        outline,
        alignment,
        margin_lr,
        margin_lr,
        margin_v,
    )
}

fn dialogue(layer: u32, start_ms: u64, end_ms: u64, style: &str, text: &str) -> String {
    format!(
        "Dialogue: {},{},{},{},,0,0,0,,{}\n",
        layer,
        format_ass_time(start_ms),
        format_ass_time(end_ms),
        style,
        text,
    )
}

/// Full line text with phrase words wrapped in an inline color override.
///
/// When the cue display text is known it drives the line, so tokens without
/// a timed word still show up; coloring follows the timed word at the same
/// position.
fn base_line(words: &[RenderInstruction], line_text: Option<&str>) -> String {
    let phrase_wrap = |text: &str| {
        format!("{{\\c{}}}{}{{\\c{}}}", COLOR_PHRASE, text, COLOR_BASE)
    };

    match line_text {
        Some(text) => {
            let parts: Vec<String> = text
                .split_whitespace()
                .enumerate()
                .map(|(index, token)| match words.get(index).map(|w| w.state) {
                    Some(HighlightState::Phrase) => phrase_wrap(token),
                    _ => token.to_string(),
                })
                .collect();
            parts.join(" ")
        }
        None => {
            let parts: Vec<String> = words
                .iter()
                .map(|word| match word.state {
                    HighlightState::Phrase => phrase_wrap(&word.text),
                    _ => word.text.clone(),
                })
                .collect();
            parts.join(" ")
        }
    }
}

/// Full line text with only the active word visible via alpha overrides.
///
/// Invisible words still occupy layout space, so the visible word lands at
/// the same position as in the base line beneath it.
fn highlight_line(words: &[RenderInstruction], active: usize) -> String {
    let parts: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if index == active {
                format!("{{\\alpha&H00&}}{}{{\\alpha&HFF&}}", word.text)
            } else {
                format!("{{\\alpha&HFF&}}{}", word.text)
            }
        })
        .collect();
    parts.join(" ")
}

// ASS timestamps carry centisecond precision
fn format_ass_time(ms: u64) -> String {
    let total_cs = ms / 10;
    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let seconds = (total_cs % 6_000) / 100;
    let centis = total_cs % 100;
    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

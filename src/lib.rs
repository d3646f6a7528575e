/*!
 * # karacut - karaoke phrase montages from subtitled clips
 *
 * A Rust library for turning a folder of short video clips with embedded
 * word-synced subtitles into a single annotated montage video.
 *
 * ## Features
 *
 * - Extract the word-synced SRT track embedded in each clip
 * - Highlight a phrase across all clips, explicit or inferred as the
 *   longest run of words every clip shares
 * - Word-by-word karaoke highlighting burned in as an ASS overlay
 * - Optional translated renditions via Google Cloud Translation, with
 *   translated text fitted back onto the original word timings
 * - Concatenation of the processed clips in filename order
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_extractor`: Word-sync SRT extraction and cue grouping
 * - `text_normalizer`: Word and phrase normalization for matching
 * - `phrase_matcher`: Locating the target phrase inside each clip
 * - `phrase_inference`: Inferring the common phrase across clips
 * - `karaoke_renderer`: Per-word highlight instruction generation
 * - `ass_builder`: ASS overlay document generation
 * - `translation`: Translation services:
 *   - `translation::core`: Core translation functionality
 *   - `translation::batch`: Concurrent translation of a clip's cues
 *   - `translation::cache`: Per-run caching of completed translations
 *   - `translation::timing`: Fitting translations onto word timings
 * - `providers`: Client implementations for translation backends:
 *   - `providers::google_translate`: Google Cloud Translation client
 *   - `providers::mock`: Deterministic mock backend for tests
 * - `sequencer`: Filename ordering and timeline offsets
 * - `video_encoder`: ffmpeg/ffprobe front-ends for burn-in and concat
 * - `file_utils`: Clip discovery and output naming
 * - `run_context`: Per-run warnings, skips and usage accounting
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod ass_builder;
pub mod errors;
pub mod file_utils;
pub mod karaoke_renderer;
pub mod language_utils;
pub mod phrase_inference;
pub mod phrase_matcher;
pub mod providers;
pub mod run_context;
pub mod sequencer;
pub mod subtitle_extractor;
pub mod text_normalizer;
pub mod translation;
pub mod video_encoder;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use phrase_inference::PhraseSelection;
pub use subtitle_extractor::{ClipSubtitles, Cue, Word};
pub use translation::TranslationService;
pub use language_utils::{normalize_to_part2t, get_language_name};
pub use errors::{AppError, ConfigError, ProviderError, SubtitleError, TranslationError};

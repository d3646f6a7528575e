/*!
 * Translation of cue text onto the original timing grid.
 *
 * This module contains the functionality for translating cue text and
 * fitting the result back onto each cue's word timings. It is split into
 * several submodules:
 *
 * - `core`: Core translation functionality and service definition
 * - `batch`: Concurrent translation of a clip's cues
 * - `cache`: Per-run caching of completed translations
 * - `timing`: Reconciliation of translated tokens with word timings
 */

// Re-export main types for easier usage
pub use self::batch::{CueTranslation, CueTranslator};
pub use self::core::{CharUsageStats, LogEntry, TranslationService};
pub use self::timing::{ReconciliationStrategy, TranslationResult};

// Submodules
pub mod batch;
pub mod cache;
pub mod core;
pub mod timing;

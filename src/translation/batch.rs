/*!
 * Concurrent translation of a clip's cues.
 *
 * Fans cue text out to the provider under a concurrency bound and maps
 * each result back onto the cue's timing grid. A cue whose translation
 * fails degrades to its original text instead of failing the clip.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::subtitle_extractor::Cue;

use super::core::{CharUsageStats, LogEntry, TranslationService};
use super::timing::{self, TranslationResult};

/// Outcome of translating one cue
#[derive(Debug, Clone)]
pub enum CueTranslation {
    /// The cue translated and was reconciled onto its timing grid
    Translated(TranslationResult),

    /// The cue keeps its original untranslated text
    Degraded {
        /// Index of the cue within its clip
        cue_index: usize,

        /// Why the translation was dropped
        reason: String,
    },
}

impl CueTranslation {
    /// Whether this cue fell back to its original text
    pub fn is_degraded(&self) -> bool {
        matches!(self, CueTranslation::Degraded { .. })
    }
}

/// Concurrent translator for the cues of one clip
pub struct CueTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,
}

impl CueTranslator {
    /// Create a new cue translator
    pub fn new(service: TranslationService) -> Self {
        Self {
            max_concurrent_requests: service.config.optimal_concurrent_requests(),
            service,
        }
    }

    /// Translate all cues of a clip into the target language.
    ///
    /// Results come back in cue order. A failed cue becomes a `Degraded`
    /// entry instead of failing the whole clip.
    pub async fn translate_cues(
        &self,
        cues: &[Cue],
        target_language: &str,
        log_capture: Arc<Mutex<Vec<LogEntry>>>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> (Vec<CueTranslation>, CharUsageStats) {
        let mut stats =
            CharUsageStats::with_provider_info(self.service.config.provider.to_string());

        if cues.is_empty() {
            return (Vec::new(), stats);
        }

        // Create a semaphore to limit concurrent requests
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));
        let rate_limit_delay_ms = self.service.config.common.rate_limit_delay_ms;

        // Track progress
        let total_cues = cues.len();
        let processed_cues = Arc::new(AtomicUsize::new(0));

        // Process cues concurrently
        let results = stream::iter(cues.iter().enumerate())
            .map(|(cue_index, cue)| {
                let service = self.service.clone();
                let semaphore = semaphore.clone();
                let log_capture = log_capture.clone();
                let processed_cues = processed_cues.clone();
                let progress_callback = progress_callback.clone();
                let target_language = target_language.to_string();

                async move {
                    // Acquire a permit from the semaphore
                    let _permit = semaphore.acquire().await.unwrap();

                    // Sleep for the rate limit delay to avoid overwhelming the API
                    if cue_index > 0 && rate_limit_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(rate_limit_delay_ms)).await;
                    }

                    let start_time = Instant::now();
                    let outcome = service
                        .translate_text_with_usage(
                            &cue.text,
                            &target_language,
                            Some(log_capture.clone()),
                        )
                        .await;

                    // Update progress
                    let current = processed_cues.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_cues);

                    if let Err(e) = &outcome {
                        log_capture.lock().push(LogEntry {
                            level: "WARN".to_string(),
                            message: format!(
                                "Cue {} failed after {:?}, keeping original text: {}",
                                cue_index + 1,
                                start_time.elapsed(),
                                e
                            ),
                        });
                    }

                    (cue_index, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Sort results by cue index to restore original order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut translations = Vec::with_capacity(cues.len());

        for (cue_index, outcome) in sorted_results {
            let cue = &cues[cue_index];
            match outcome {
                Ok((translated_text, api_duration)) => {
                    match api_duration {
                        Some(duration) => {
                            stats.add_request(cue.text.chars().count() as u64, duration);
                        }
                        None => stats.add_cache_hit(),
                    }

                    match timing::reconcile_cue(cue, cue_index, &translated_text) {
                        Some(result) => translations.push(CueTranslation::Translated(result)),
                        None => {
                            log_capture.lock().push(LogEntry {
                                level: "WARN".to_string(),
                                message: format!(
                                    "Cue {} has no usable timing slots for '{}', keeping original text",
                                    cue_index + 1,
                                    translated_text
                                ),
                            });
                            translations.push(CueTranslation::Degraded {
                                cue_index,
                                reason: "no usable timing slots".to_string(),
                            });
                        }
                    }
                }
                Err(e) => {
                    translations.push(CueTranslation::Degraded {
                        cue_index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        (translations, stats)
    }
}

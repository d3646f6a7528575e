/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which wraps the
 * configured provider client and adds caching, per-request timeouts and
 * usage accounting on top of it.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::time::timeout;

use crate::app_config::{
    TranslationCommonConfig, TranslationConfig, TranslationProvider as ConfigTranslationProvider,
};
use crate::errors::TranslationError;
use crate::providers::google_translate::GoogleTranslate;
use crate::providers::mock::MockTranslator;
use crate::providers::{Provider, TranslateRequest, TranslateResponse};
use super::cache::TranslationCache;

/// Character usage statistics for tracking API consumption
#[derive(Clone)]
pub struct CharUsageStats {
    /// Number of characters submitted to the API
    pub chars_submitted: u64,

    /// Number of API requests made
    pub requests: u64,

    /// Number of translations served from the cache
    pub cache_hits: u64,

    /// Start time of usage tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,
}

impl Default for CharUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CharUsageStats {
    /// Create a new empty usage stats instance
    pub fn new() -> Self {
        Self {
            chars_submitted: 0,
            requests: 0,
            cache_hits: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider: String::new(),
        }
    }

    /// Create new usage stats with provider info
    pub fn with_provider_info(provider: String) -> Self {
        Self {
            provider,
            ..Self::new()
        }
    }

    /// Record one completed API request
    pub fn add_request(&mut self, chars: u64, duration: Duration) {
        self.chars_submitted += chars;
        self.requests += 1;
        self.api_duration += duration;
    }

    /// Record one translation served from the cache
    pub fn add_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Calculate characters per minute rate
    pub fn chars_per_minute(&self) -> f64 {
        // Use the API duration for rate calculation, with fallback to elapsed time
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.chars_submitted as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of API usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Translation Usage Summary:\n\
             Provider: {}\n\
             Requests: {}\n\
             Cache hits: {}\n\
             Characters submitted: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Characters per minute: {:.2}",
            self.provider,
            self.requests,
            self.cache_hits,
            self.chars_submitted,
            elapsed_minutes,
            api_minutes,
            self.chars_per_minute()
        )
    }
}

/// Log entry for capturing translation process logs
#[derive(Clone)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Translation provider implementation variants
#[derive(Clone)]
enum TranslationProviderImpl {
    /// Google Cloud Translation API
    Google {
        /// Client instance
        client: GoogleTranslate,
    },

    /// Scriptable in-process stand-in used by tests
    Mock {
        /// Client instance
        client: MockTranslator,
    },
}

/// Translation service for cue text.
///
/// Clones share the same cache, so concurrent tasks translating the same
/// text only pay for it once.
#[derive(Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service from the given configuration
    pub fn new(config: &TranslationConfig) -> Self {
        let provider = match config.provider {
            ConfigTranslationProvider::Google => TranslationProviderImpl::Google {
                client: GoogleTranslate::new_with_config(
                    config.get_endpoint(),
                    config.get_api_key(),
                    config.get_timeout_secs(),
                    config.common.retry_count,
                    config.common.retry_backoff_ms,
                    config.get_rate_limit(),
                ),
            },
            ConfigTranslationProvider::Mock => TranslationProviderImpl::Mock {
                client: MockTranslator::working(),
            },
        };

        Self {
            provider,
            config: config.clone(),
            cache: TranslationCache::new(true),
        }
    }

    /// Create a service backed by a specific mock client
    pub fn with_mock(client: MockTranslator) -> Self {
        // The in-process mock needs no request pacing
        let config = TranslationConfig {
            provider: ConfigTranslationProvider::Mock,
            common: TranslationCommonConfig {
                rate_limit_delay_ms: 0,
                ..TranslationCommonConfig::default()
            },
            ..TranslationConfig::default()
        };

        Self {
            provider: TranslationProviderImpl::Mock { client },
            config,
            cache: TranslationCache::new(true),
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(
        &self,
        log_capture: Option<Arc<Mutex<Vec<LogEntry>>>>,
    ) -> Result<(), TranslationError> {
        if let Some(log) = &log_capture {
            log.lock().push(LogEntry {
                level: "INFO".to_string(),
                message: format!(
                    "Testing connection to {} provider",
                    self.config.provider.display_name()
                ),
            });
        }

        let result = match &self.provider {
            TranslationProviderImpl::Google { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        };

        match result {
            Ok(()) => {
                if let Some(log) = &log_capture {
                    log.lock().push(LogEntry {
                        level: "INFO".to_string(),
                        message: format!(
                            "Successfully connected to {} provider",
                            self.config.provider.display_name()
                        ),
                    });
                }
                Ok(())
            }
            Err(e) => {
                if let Some(log) = &log_capture {
                    log.lock().push(LogEntry {
                        level: "ERROR".to_string(),
                        message: format!(
                            "Failed to connect to {} provider: {}",
                            self.config.provider.display_name(),
                            e
                        ),
                    });
                }
                Err(TranslationError::Provider(e))
            }
        }
    }

    /// Translate a single text string
    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let (translated, _) = self
            .translate_text_with_usage(text, target_language, None)
            .await?;
        Ok(translated)
    }

    /// Translate text, reporting the API round-trip duration.
    ///
    /// The duration is `None` when the translation came from the cache or
    /// the input was empty, so callers can account requests and cache hits
    /// separately.
    pub async fn translate_text_with_usage(
        &self,
        text: &str,
        target_language: &str,
        log_capture: Option<Arc<Mutex<Vec<LogEntry>>>>,
    ) -> Result<(String, Option<Duration>), TranslationError> {
        // Skip empty text
        if text.trim().is_empty() {
            return Ok((String::new(), None));
        }

        // Check cache first
        if let Some(cached_translation) = self.cache.get(text, target_language) {
            if let Some(log) = &log_capture {
                log.lock().push(LogEntry {
                    level: "INFO".to_string(),
                    message: format!("Cache hit for translation (-> {})", target_language),
                });
            }
            return Ok((cached_translation, None));
        }

        let request = TranslateRequest {
            text: text.to_string(),
            target_language: target_language.to_string(),
        };

        let timeout_secs = self.config.get_timeout_secs();
        let start_time = Instant::now();

        let result = match &self.provider {
            TranslationProviderImpl::Google { client } => {
                complete_with_timeout(client, request, timeout_secs).await
            }
            TranslationProviderImpl::Mock { client } => {
                complete_with_timeout(client, request, timeout_secs).await
            }
        };

        match result {
            Ok(response) => {
                let duration = start_time.elapsed();

                if let Some(log) = &log_capture {
                    log.lock().push(LogEntry {
                        level: "INFO".to_string(),
                        message: format!(
                            "{} response received in {:?}",
                            self.config.provider.display_name(),
                            duration
                        ),
                    });
                }

                if response.translated_text.trim().is_empty() {
                    return Err(TranslationError::EmptyResult);
                }

                // Store in cache
                self.cache.store(text, target_language, &response.translated_text);

                Ok((response.translated_text, Some(duration)))
            }
            Err(e) => {
                if let Some(log) = &log_capture {
                    log.lock().push(LogEntry {
                        level: "ERROR".to_string(),
                        message: format!(
                            "{} translation error: {}",
                            self.config.provider.display_name(),
                            e
                        ),
                    });
                }
                Err(e)
            }
        }
    }
}

/// Run one provider call under the per-request time budget
async fn complete_with_timeout<P>(
    client: &P,
    request: TranslateRequest,
    timeout_secs: u64,
) -> Result<TranslateResponse, TranslationError>
where
    P: Provider<Request = TranslateRequest, Response = TranslateResponse>,
{
    match timeout(Duration::from_secs(timeout_secs), client.complete(request)).await {
        Ok(result) => result.map_err(TranslationError::Provider),
        Err(_) => Err(TranslationError::Timeout(timeout_secs)),
    }
}

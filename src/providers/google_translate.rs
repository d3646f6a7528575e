use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use log::error;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslateRequest, TranslateResponse};

/// Default endpoint of the Google Cloud Translation v2 API
pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Client for the Google Cloud Translation v2 API
#[derive(Clone)]
pub struct GoogleTranslate {
    /// Endpoint of the translation API
    endpoint: String,
    /// API key sent with every request
    api_key: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

impl fmt::Debug for GoogleTranslate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GoogleTranslate")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

// Response body of the v2 API: data.translations[0].translatedText
#[derive(Debug, Deserialize)]
struct ApiResponse {
    data: ApiData,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    translations: Vec<ApiTranslation>,
}

#[derive(Debug, Deserialize)]
struct ApiTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl GoogleTranslate {
    /// Create a client with default endpoint and retry settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_config(DEFAULT_ENDPOINT, api_key, 30, 3, 1000, None)
    }

    /// Create a client with full configuration
    pub fn new_with_config(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Translate one text with retry logic.
    ///
    /// Transport failures, HTTP 5xx and HTTP 429 are retried with exponential
    /// backoff plus jitter; other client errors end the call immediately.
    pub async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ProviderError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            // Add rate limiting if configured
            if let Some(rate_limit) = self.rate_limit {
                let delay_ms = 60_000 / rate_limit as u64; // Convert requests per minute to milliseconds
                if attempt > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response_result = self.client.post(&self.endpoint)
                .form(&[
                    ("q", request.text.as_str()),
                    ("target", request.target_language.as_str()),
                    ("key", self.api_key.as_str()),
                ])
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            ProviderError::ParseError(format!("failed to read response body: {}", e))
                        })?;

                        match serde_json::from_str::<ApiResponse>(&body) {
                            Ok(parsed) => {
                                return match parsed.data.translations.into_iter().next() {
                                    Some(translation) => Ok(TranslateResponse {
                                        translated_text: translation.translated_text,
                                    }),
                                    None => Err(ProviderError::ParseError(
                                        "response carried no translations".to_string(),
                                    )),
                                };
                            }
                            Err(e) => {
                                // A 200 with an unexpected body will not improve
                                // on retry
                                return Err(ProviderError::ParseError(format!(
                                    "unexpected response shape: {}",
                                    e
                                )));
                            }
                        }
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation API error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else if status.as_u16() == 429 {
                        // Quota pressure - worth retrying after backoff
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation API rate limited - attempt {}/{}", attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::RateLimitExceeded(error_text));
                    } else if status.as_u16() == 401 || status.as_u16() == 403 {
                        // Bad key - don't retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation API rejected the key ({}): {}", status, error_text);
                        return Err(ProviderError::AuthenticationError(error_text));
                    } else {
                        // Other client error - don't retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                },
                Err(e) => {
                    // Network error - can retry
                    error!("Translation API network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff and
            // a little jitter so parallel cues don't retry in lockstep
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                let jitter_ms = rand::rng().random_range(0..=self.backoff_base_ms / 4 + 1);
                tokio::time::sleep(Duration::from_millis(backoff_ms + jitter_ms)).await;
            }
        }

        // If we get here, all retries failed
        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "translation request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = TranslateRequest;
    type Response = TranslateResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.translate(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // The languages listing is the cheapest authenticated call
        let url = format!("{}/languages", self.endpoint);
        let response = self.client.get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(ProviderError::AuthenticationError(format!(
                "API key rejected with status {}",
                status
            )))
        } else {
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "connection test failed".to_string(),
            })
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.translated_text.clone()
    }
}

use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO) of the embedded subtitle tracks
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language codes (ISO); one translated rendition per entry
    #[serde(default)]
    pub target_languages: Vec<String>,

    /// Phrase to highlight; inferred from the clips when absent
    #[serde(default)]
    pub target_phrase: Option<String>,

    /// Output canvas size as WIDTHxHEIGHT
    #[serde(default = "default_video_size")]
    pub video_size: String,

    /// Directory holding the overlay font, passed to the encoder
    #[serde(default)]
    pub fonts_dir: Option<String>,

    /// Font family used by all overlay styles
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// Base font size of the karaoke line; secondary styles scale with it
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Caption shown at the top of every clip
    #[serde(default = "default_website_text")]
    pub website_text: String,

    /// Directory receiving the final montage files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Keep per-clip temporary directories after the run
    #[serde(default)]
    pub keep_temp: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Cloud Translation v2
    #[default]
    Google,
    // @provider: In-process mock used by tests
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(ConfigError::InvalidProvider(s.to_string())),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_google_rate_limit(),
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                api_key: String::new(),
                endpoint: String::new(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
                rate_limit: None,
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Rate limit delay in milliseconds between consecutive requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_video_size() -> String {
    "640x480".to_string()
}

fn default_font_name() -> String {
    "Roboto-Regular".to_string()
}

fn default_font_size() -> u32 {
    38 // Sized for the 640-wide reference canvas
}

fn default_website_text() -> String {
    "playphrase.me".to_string()
}

fn default_output_dir() -> String {
    "result".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_delay_ms() -> u64 {
    500 // 500ms default delay between requests
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_google_rate_limit() -> Option<u32> {
    // Well below the default per-minute request quota of the v2 API
    Some(600)
}

/// Parse a WIDTHxHEIGHT video size string
pub fn parse_video_size(size: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidVideoSize(size.to_string());

    let (width_str, height_str) = size.split_once('x').ok_or_else(invalid)?;
    let width: u32 = width_str.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height_str.trim().parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate the output size
        parse_video_size(&self.video_size)?;

        // Validate languages
        language_utils::get_language_name(&self.source_language)
            .map_err(|_| ConfigError::InvalidLanguage(self.source_language.clone()))?;
        for language in &self.target_languages {
            language_utils::get_language_name(language)
                .map_err(|_| ConfigError::InvalidLanguage(language.clone()))?;
        }

        // Translated renditions need an API key for the external service
        if let Some(language) = self.target_languages.first() {
            if self.translation.provider == TranslationProvider::Google
                && self.translation.get_api_key().is_empty()
            {
                return Err(ConfigError::MissingApiKey(language.clone()));
            }
        }

        Ok(())
    }

    /// Output canvas dimensions, parsed from the configured size
    pub fn video_dimensions(&self) -> Result<(u32, u32), ConfigError> {
        parse_video_size(&self.video_size)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_languages: Vec::new(),
            target_phrase: None,
            video_size: default_video_size(),
            fonts_dir: None,
            font_name: default_font_name(),
            font_size: default_font_size(),
            website_text: default_website_text(),
            output_dir: default_output_dir(),
            keep_temp: false,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    pub fn optimal_concurrent_requests(&self) -> usize {
        // Check if the provider exists in the available_providers
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.concurrent_requests;
        }

        // Default fallback
        default_concurrent_requests()
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Default fallback - the mock provider doesn't use API keys
        String::new()
    }

    /// Set the API key on the active provider
    pub fn set_api_key(&mut self, api_key: &str) {
        let provider_str = self.provider.to_lowercase_string();
        if let Some(provider_config) = self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.api_key = api_key.to_string();
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.timeout_secs;
        }

        // Default fallback
        default_timeout_secs()
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.rate_limit;
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => default_google_rate_limit(),
            TranslationProvider::Mock => None,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Google));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Mock));

        config
    }
}

/*!
 * Error types for the karacut application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with the translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while pulling or parsing a clip's subtitle track
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The clip carries no embedded subtitle track
    #[error("No subtitle track found in {0}")]
    MissingTrack(String),

    /// The embedded track exists but cannot be parsed into timed words
    #[error("Malformed subtitle track: {0}")]
    Malformed(String),

    /// The extraction subprocess itself failed or timed out
    #[error("Subtitle extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Errors that can occur during translation of a single cue
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The translation call exceeded its per-request time budget
    #[error("Translation timed out after {0}s")]
    Timeout(u64),

    /// The service answered with no usable text
    #[error("Translation service returned an empty result")]
    EmptyResult,
}

/// Errors in the run configuration, detected before any clip is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A target language was requested but no API key is available
    #[error("Target language '{0}' requires a translation API key")]
    MissingApiKey(String),

    /// A language code is not a recognized ISO 639 code
    #[error("Unknown language code: {0}")]
    InvalidLanguage(String),

    /// The output size is not a WxH pair
    #[error("Invalid video size '{0}', expected WIDTHxHEIGHT")]
    InvalidVideoSize(String),

    /// The requested translation provider is not known
    #[error("Invalid provider type: {0}")]
    InvalidProvider(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error in the run configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

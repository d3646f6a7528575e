/*!
 * Translation provider implementations.
 *
 * This module contains the client for the external translation service and a
 * behavior-programmable mock used by tests:
 * - GoogleTranslate: Google Cloud Translation v2 client
 * - MockTranslator: simulated provider for exercising failure handling
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One translation request, shared by all providers
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// The text to translate
    pub text: String,
    /// ISO 639 code of the target language
    pub target_language: String,
}

/// One translated text, shared by all providers
#[derive(Debug, Clone)]
pub struct TranslateResponse {
    /// Translated text as returned by the service
    pub translated_text: String,
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

pub mod google_translate;
pub mod mock;

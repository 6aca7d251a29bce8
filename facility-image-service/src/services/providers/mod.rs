//! Image provider abstraction and implementations.
//!
//! A trait-based seam over the upstream generative-image API so the HTTP
//! surface can be exercised against a mock backend.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider response did not contain an image")]
    MissingImage,
}

impl ProviderError {
    /// Stable label used for the provider error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::MissingImage => "missing_image",
        }
    }
}

/// A successfully generated image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes, passed through to the caller unchanged.
    pub base64_data: String,
}

/// Trait for generative-image providers (Gemini in production, mock in tests).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider label for logs and metrics.
    fn name(&self) -> &'static str;

    /// Generate a single image for the given prompt.
    ///
    /// One outbound call per invocation. Retries, if any, belong to the
    /// caller's platform, not to the provider.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

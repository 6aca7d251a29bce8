//! Gemini image provider implementation.
//!
//! Issues a single `generateImage` call per request and extracts the base64
//! payload from the reply.

use super::{GeneratedImage, ImageProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
}

/// Gemini image provider.
pub struct GeminiImageProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiImageProvider {
    pub fn new(config: GeminiConfig) -> Self {
        // No timeout override and no retry policy here: each generate call is
        // a single attempt bounded by the caller's own deadline.
        let client = Client::new();

        Self { config, client }
    }

    /// Build the API URL for the given method. The key travels as a query
    /// parameter, per the Gemini API contract.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.api_base,
            self.config.model,
            method,
            self.config.api_key.expose_secret()
        )
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let request = GenerateImageRequest {
            prompt: PromptText {
                text: prompt.to_string(),
            },
        };

        let url = self.api_url("generateImage");

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini image API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let base64_data = api_response
            .image
            .and_then(|image| image.base64_data)
            .filter(|data| !data.is_empty());

        match base64_data {
            Some(data) => Ok(GeneratedImage { base64_data: data }),
            None => Err(ProviderError::MissingImage),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        // List models to verify the key and endpoint are answering.
        let url = format!(
            "{}/models?key={}",
            self.config.api_base,
            self.config.api_key.expose_secret()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateImageRequest {
    prompt: PromptText,
}

#[derive(Debug, Serialize)]
struct PromptText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateImageResponse {
    #[serde(default)]
    image: Option<ImagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload {
    #[serde(default)]
    base64_data: Option<String>,
}

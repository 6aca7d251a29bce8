//! Mock provider implementation for testing.

use super::{GeneratedImage, ImageProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned outcome returned by [`MockImageProvider::generate`].
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Image(String),
    MissingImage,
    ApiError(String),
    NetworkError(String),
}

/// Mock image provider that records every prompt it receives.
pub struct MockImageProvider {
    outcome: MockOutcome,
    prompts: Mutex<Vec<String>>,
}

impl MockImageProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that answers every call with the given base64 payload.
    pub fn returning_image(base64_data: &str) -> Self {
        Self::new(MockOutcome::Image(base64_data.to_string()))
    }

    /// Prompts received so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt lock poisoned").clone()
    }

    /// Number of generate calls received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().expect("prompt lock poisoned").len()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        self.prompts
            .lock()
            .expect("prompt lock poisoned")
            .push(prompt.to_string());

        match &self.outcome {
            MockOutcome::Image(base64_data) => Ok(GeneratedImage {
                base64_data: base64_data.clone(),
            }),
            MockOutcome::MissingImage => Err(ProviderError::MissingImage),
            MockOutcome::ApiError(msg) => Err(ProviderError::ApiError(msg.clone())),
            MockOutcome::NetworkError(msg) => Err(ProviderError::NetworkError(msg.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

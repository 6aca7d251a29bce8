//! Facility image generation endpoint.
//!
//! Linear pipeline: validate, build the prompt, make one provider call,
//! pass the base64 payload through unchanged.

use crate::services::metrics;
use crate::services::prompt::facility_prompt;
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Instant;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct FacilityImageRequest {
    /// Facility name to render. A missing field is treated as empty and
    /// rejected.
    #[serde(default)]
    #[validate(length(min = 1, message = "Facility name is required"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FacilityImageResponse {
    /// Base64-encoded image bytes, exactly as the provider returned them.
    pub image: String,
}

pub async fn generate_facility_image(
    State(state): State<AppState>,
    Json(req): Json<FacilityImageRequest>,
) -> Result<Json<FacilityImageResponse>, AppError> {
    let request_id = uuid::Uuid::new_v4().to_string();

    // Reject before any outbound call is attempted.
    if let Err(e) = req.validate() {
        metrics::record_image_request("invalid");
        return Err(AppError::from(e));
    }

    let provider = state.image_provider.as_ref();
    let model = state.config.models.image_model.as_str();
    let prompt = facility_prompt(&req.name);

    tracing::info!(
        request_id = %request_id,
        model = %model,
        name_len = req.name.len(),
        "Generating facility image"
    );

    let started = Instant::now();
    let result = provider.generate(&prompt).await;
    metrics::record_provider_latency(provider.name(), model, started.elapsed().as_secs_f64());

    match result {
        Ok(image) => {
            metrics::record_image_request("ok");
            tracing::info!(
                request_id = %request_id,
                image_len = image.base64_data.len(),
                "Facility image generated"
            );
            Ok(Json(FacilityImageResponse {
                image: image.base64_data,
            }))
        }
        Err(err @ ProviderError::MissingImage) => {
            metrics::record_provider_error(provider.name(), err.kind());
            metrics::record_image_request("upstream_data_error");
            tracing::error!(
                request_id = %request_id,
                provider = provider.name(),
                error = %err,
                "Provider reply carried no image"
            );
            Err(AppError::BadGateway(
                "image service did not return an image".to_string(),
            ))
        }
        Err(err) => {
            metrics::record_provider_error(provider.name(), err.kind());
            metrics::record_image_request("upstream_call_error");
            // The cause stays server-side; callers get the generic message.
            tracing::error!(
                request_id = %request_id,
                provider = provider.name(),
                error = %err,
                "Image provider call failed"
            );
            Err(AppError::BadGateway("image generation failed".to_string()))
        }
    }
}

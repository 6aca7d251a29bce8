//! Application startup and lifecycle management.

use crate::config::FacilityImageConfig;
use crate::handlers::generate::generate_facility_image;
use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::metrics::metrics_handler;
use crate::services::metrics;
use crate::services::providers::ImageProvider;
use crate::services::providers::gemini::{GeminiConfig, GeminiImageProvider};
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use service_core::error::AppError;
use service_core::middleware::tracing::{REQUEST_ID_HEADER, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. Each request is independent; the only shared
/// pieces are the configuration and the provider's HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub config: FacilityImageConfig,
    pub image_provider: Arc<dyn ImageProvider>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: FacilityImageConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.models.image_model.clone(),
            api_base: config.google.api_base.clone(),
        };
        let image_provider: Arc<dyn ImageProvider> =
            Arc::new(GeminiImageProvider::new(gemini_config));

        tracing::info!(
            model = %config.models.image_model,
            "Initialized Gemini image provider"
        );

        let state = AppState {
            config: config.clone(),
            image_provider,
        };

        // Port 0 binds a random port for tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        metrics::init_metrics();

        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    // The scaling cap is configuration, not scheduling logic: one global
    // semaphore bounds how many requests are in flight at once.
    let max_concurrency = state.config.common.max_concurrency;

    Router::new()
        .route("/v1/facility-image", post(generate_facility_image))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(metrics::http_metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrency))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

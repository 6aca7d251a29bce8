//! Shared harness for integration tests: spawns the service on a random port
//! and stands up a stub Gemini endpoint that records every request it sees.

#![allow(dead_code)]

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use facility_image_service::config::{FacilityImageConfig, GoogleConfig, ModelConfig};
use facility_image_service::startup::Application;
use secrecy::Secret;
use serde_json::json;
use service_core::config::Config;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Canned reply the stub upstream sends for generateImage calls.
#[derive(Clone, Copy)]
pub enum UpstreamBehavior {
    /// Reply with `{"image": {"base64Data": <data>}}`.
    Image(&'static str),
    /// Reply 200 with a body that has no image field.
    NoImageField,
    /// Reply 200 with an empty base64Data value.
    EmptyImage,
    /// Reply 500.
    ServerError,
}

#[derive(Clone)]
struct StubState {
    behavior: UpstreamBehavior,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

/// An in-process stand-in for the Gemini API.
pub struct UpstreamStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl UpstreamStub {
    pub async fn spawn(behavior: UpstreamBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behavior,
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/v1beta/models/:model_call", post(generate_image_stub))
            .route("/v1beta/models", get(list_models_stub))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub has no local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{}/v1beta", addr),
            requests,
        }
    }

    /// Number of generateImage requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request lock poisoned").len()
    }

    /// Bodies of the generateImage requests received, in order.
    pub fn recorded_bodies(&self) -> Vec<serde_json::Value> {
        self.requests.lock().expect("request lock poisoned").clone()
    }
}

async fn generate_image_stub(
    State(state): State<StubState>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    state
        .requests
        .lock()
        .expect("request lock poisoned")
        .push(body);

    match state.behavior {
        UpstreamBehavior::Image(data) => Json(json!({"image": {"base64Data": data}})).into_response(),
        UpstreamBehavior::NoImageField => Json(json!({"done": true})).into_response(),
        UpstreamBehavior::EmptyImage => Json(json!({"image": {"base64Data": ""}})).into_response(),
        UpstreamBehavior::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
    }
}

async fn list_models_stub() -> Json<serde_json::Value> {
    Json(json!({"models": [{"name": "models/gemini-1.5-flash"}]}))
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Spawn the service on a random port, pointed at the given upstream base.
pub async fn spawn_app(api_base: &str) -> TestApp {
    let config = FacilityImageConfig {
        common: Config {
            port: 0,
            max_concurrency: 10,
        },
        google: GoogleConfig {
            api_key: Secret::new("test-api-key".to_string()),
            api_base: api_base.to_string(),
        },
        models: ModelConfig {
            image_model: "gemini-1.5-flash".to_string(),
        },
    };

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestApp {
        address: format!("http://localhost:{}", port),
        client: reqwest::Client::new(),
    }
}

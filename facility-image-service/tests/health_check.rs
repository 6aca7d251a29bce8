//! Integration tests for the operational endpoints.

mod common;

use common::{UpstreamBehavior, UpstreamStub, spawn_app};
use std::time::Duration;

#[tokio::test]
async fn health_check_returns_ok() {
    let upstream = UpstreamStub::spawn(UpstreamBehavior::Image("QUJD")).await;
    let app = spawn_app(&upstream.base_url).await;

    let response = app
        .client
        .get(app.url("/health"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "facility-image-service");
}

#[tokio::test]
async fn readiness_check_returns_ok_when_upstream_answers() {
    let upstream = UpstreamStub::spawn(UpstreamBehavior::Image("QUJD")).await;
    let app = spawn_app(&upstream.base_url).await;

    let response = app
        .client
        .get(app.url("/ready"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_fails_when_upstream_is_unreachable() {
    // Reserve a port and release it so nothing is listening there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let dead_addr = listener.local_addr().expect("No local addr");
    drop(listener);

    let app = spawn_app(&format!("http://{}/v1beta", dead_addr)).await;

    let response = app
        .client
        .get(app.url("/ready"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let upstream = UpstreamStub::spawn(UpstreamBehavior::Image("QUJD")).await;
    let app = spawn_app(&upstream.base_url).await;

    // Generate one request so the counters exist.
    let _ = app
        .client
        .post(app.url("/v1/facility-image"))
        .json(&serde_json::json!({"name": "Metrics Clinic"}))
        .send()
        .await
        .expect("Failed to send request");

    let response = app
        .client
        .get(app.url("/metrics"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("facility_image_requests_total"));
    assert!(body.contains("http_requests_total"));
}

use crate::services::metrics;

/// Prometheus scrape endpoint.
pub async fn metrics_handler() -> String {
    metrics::get_metrics()
}

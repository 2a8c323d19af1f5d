//! Prometheus Metrics Definitions
//!
//! Request, store and catalog metrics, exposed on GET /metrics.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance, registered on first use.
pub static METRICS: Lazy<ApiResult<StockroomMetrics>> = Lazy::new(StockroomMetrics::new);

/// The registered metrics, or `None` if registration failed (logged once).
pub fn metrics() -> Option<&'static StockroomMetrics> {
    METRICS.as_ref().ok()
}

#[derive(Clone)]
pub struct StockroomMetrics {
    /// labels: method, path, status
    pub http_requests_total: CounterVec,

    /// labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// labels: operation, entity, status
    pub catalog_operations_total: CounterVec,

    /// Version conflicts hit while writing a product. labels: operation
    pub product_write_conflicts_total: CounterVec,
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    let error = ApiError::internal_error(format!("Failed to register {}: {}", name, err));
    tracing::error!(metric = name, error = %err, "Metric registration failed");
    error
}

impl StockroomMetrics {
    /// Create and register all metrics with the default Prometheus registry.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "stockroom_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "stockroom_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            catalog_operations_total: register_counter_vec!(
                "stockroom_catalog_operations_total",
                "Catalog service operations by outcome",
                &["operation", "entity", "status"]
            )
            .map_err(|e| registration_error("catalog_operations_total", e))?,

            product_write_conflicts_total: register_counter_vec!(
                "stockroom_product_write_conflicts_total",
                "Optimistic product writes that lost to a concurrent writer",
                &["operation"]
            )
            .map_err(|e| registration_error("product_write_conflicts_total", e))?,
        })
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_catalog_operation(&self, operation: &str, entity: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.catalog_operations_total
            .with_label_values(&[operation, entity, status])
            .inc();
    }

    pub fn record_write_conflict(&self, operation: &str) {
        self.product_write_conflicts_total
            .with_label_values(&[operation])
            .inc();
    }
}

/// Handler for GET /metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Touch the lazy so an idle server still exports its metric families.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    fn registered() -> Result<&'static StockroomMetrics, String> {
        METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))
    }

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = registered()?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_http_request() -> Result<(), String> {
        let metrics = registered()?;
        metrics.record_http_request("GET", "/products/{id}", 200, 0.015);
        let count = metrics
            .http_requests_total
            .with_label_values(&["GET", "/products/{id}", "200"])
            .get();
        assert!(count >= 1.0);
        Ok(())
    }

    #[test]
    fn test_record_catalog_metrics() -> Result<(), String> {
        let metrics = registered()?;
        metrics.record_catalog_operation("create", "component", true);
        metrics.record_catalog_operation("delete", "product", false);
        metrics.record_write_conflict("add_component");
        let conflicts = metrics
            .product_write_conflicts_total
            .with_label_values(&["add_component"])
            .get();
        assert!(conflicts >= 1.0);
        Ok(())
    }
}

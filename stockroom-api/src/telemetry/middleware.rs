//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Wraps every request in an `http_request` span, records Prometheus
//! counters and latency, and logs one line per completed request.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::metrics;

/// 24-hex record ids as a whole path segment.
static RECORD_ID_SEGMENT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"/[0-9a-fA-F]{24}(/|$)").ok());

/// Replace record ids with `{id}` so route labels stay low-cardinality.
pub(crate) fn normalize_path(path: &str) -> String {
    let Some(pattern) = RECORD_ID_SEGMENT.as_ref() else {
        return path.to_string();
    };
    // A match consumes its trailing slash, leaving the next id without a leading one.
    let once = pattern.replace_all(path, "/{id}$1");
    pattern.replace_all(&once, "/{id}$1").into_owned()
}

pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(metrics) = metrics() {
        metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        );
    }

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_record_id() {
        let path = "/products/65a1f0c2b3d4e5f60718293a";
        assert_eq!(normalize_path(path), "/products/{id}");
    }

    #[test]
    fn test_normalize_path_nested_ids() {
        let path = "/api/products/65a1f0c2b3d4e5f60718293a/components/65A1F0C2B3D4E5F60718293B";
        assert_eq!(normalize_path(path), "/api/products/{id}/components/{id}");
    }

    #[test]
    fn test_normalize_path_adjacent_ids() {
        let path = "/x/65a1f0c2b3d4e5f60718293a/65a1f0c2b3d4e5f60718293b";
        assert_eq!(normalize_path(path), "/x/{id}/{id}");
    }

    #[test]
    fn test_normalize_path_leaves_other_segments() {
        assert_eq!(normalize_path("/components/export"), "/components/export");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/components/not-an-id"), "/components/not-an-id");
    }
}

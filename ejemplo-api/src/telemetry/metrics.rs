//! Prometheus Metrics Definitions
//!
//! Defines the Ejemplo metrics with appropriate labels and types.
//! Exposes a /metrics endpoint for Prometheus scraping.

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

/// Content store query latency buckets (seconds)
const STORE_LATENCY_BUCKETS: &[f64] =
    &[0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5];

/// Global metrics instance - initialized once at startup
pub static METRICS: Lazy<ApiResult<EjemploMetrics>> = Lazy::new(EjemploMetrics::new);

/// How a retrieval request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalOutcome {
    Ok,
    Invalid,
    NotFound,
    Internal,
}

impl RetrievalOutcome {
    pub fn as_label(self) -> &'static str {
        match self {
            RetrievalOutcome::Ok => "ok",
            RetrievalOutcome::Invalid => "invalid",
            RetrievalOutcome::NotFound => "not_found",
            RetrievalOutcome::Internal => "internal",
        }
    }
}

/// Container for all Ejemplo metrics.
#[derive(Clone)]
pub struct EjemploMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Content store query counter - labels: status
    pub store_queries_total: CounterVec,

    /// Content store query duration histogram - labels: status
    pub store_query_duration_seconds: HistogramVec,

    /// Retrieval outcome counter - labels: outcome
    pub retrievals_total: CounterVec,
}

impl EjemploMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "ejemplo_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "ejemplo_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            store_queries_total: register_counter_vec!(
                "ejemplo_store_queries_total",
                "Total number of content store queries",
                &["status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register store_queries_total: {}", e)))?,

            store_query_duration_seconds: register_histogram_vec!(
                "ejemplo_store_query_duration_seconds",
                "Content store query duration in seconds",
                &["status"],
                STORE_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register store_query_duration_seconds: {}", e)))?,

            retrievals_total: register_counter_vec!(
                "ejemplo_retrievals_total",
                "Total retrieval requests by outcome",
                &["outcome"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register retrievals_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a content store query.
    pub fn record_store_query(&self, success: bool, duration_secs: f64) {
        let status = if success { "success" } else { "error" };
        self.store_queries_total.with_label_values(&[status]).inc();
        self.store_query_duration_seconds
            .with_label_values(&[status])
            .observe(duration_secs);
    }

    /// Record how a retrieval ended.
    pub fn record_retrieval(&self, outcome: RetrievalOutcome) {
        self.retrievals_total
            .with_label_values(&[outcome.as_label()])
            .inc();
    }
}

/// Run `record` against the global metrics if they registered.
pub fn with_metrics(record: impl FnOnce(&EjemploMetrics)) {
    match METRICS.as_ref() {
        Ok(metrics) => record(metrics),
        Err(e) => tracing::warn!(error = %e, "Metrics unavailable"),
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
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

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_store_query() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        let before = metrics.store_queries_total.with_label_values(&["error"]).get();
        metrics.record_store_query(false, 0.002);
        let after = metrics.store_queries_total.with_label_values(&["error"]).get();
        assert!(after >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_retrieval_outcomes() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        for outcome in [
            RetrievalOutcome::Ok,
            RetrievalOutcome::Invalid,
            RetrievalOutcome::NotFound,
            RetrievalOutcome::Internal,
        ] {
            metrics.record_retrieval(outcome);
            assert!(
                metrics
                    .retrievals_total
                    .with_label_values(&[outcome.as_label()])
                    .get()
                    >= 1.0
            );
        }
        Ok(())
    }

    #[test]
    fn test_with_metrics_runs_recorder() {
        let mut ran = false;
        with_metrics(|metrics| {
            metrics.record_http_request("GET", "/rest/ejemplo", 200, 0.015);
            ran = true;
        });
        assert!(ran);
    }
}

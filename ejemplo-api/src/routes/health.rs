//! Health Check Endpoints
//!
//! - /health/ping - answers `pong`
//! - /health/live - the process is up
//! - /health/ready - the content store answers, and content was seeded
//!
//! A reachable store without a configured seed reports `degraded`: the
//! service can take traffic, but every retrieval will come back 404.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use ejemplo_storage::ContentStore;
use serde::{Deserialize, Serialize};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Only an unhealthy service is taken out of rotation.
    pub fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ReadinessDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadinessDetails {
    pub content_store: StoreCheck,
    /// Whether the server was started with a content seed.
    pub seeded: bool,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Outcome of pinging the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoreCheck {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreCheck {
    pub async fn run(store: &dyn ContentStore) -> Self {
        let started = Instant::now();
        match store.ping().await {
            Ok(()) => Self {
                reachable: true,
                latency_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
                error: None,
            },
            Err(e) => Self {
                reachable: false,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Overall readiness for a store check and the seed state.
pub fn assess(check: &StoreCheck, seeded: bool) -> (HealthStatus, Option<String>) {
    match (check.reachable, seeded) {
        (false, _) => (
            HealthStatus::Unhealthy,
            Some("Content store is unreachable".to_string()),
        ),
        (true, false) => (
            HealthStatus::Degraded,
            Some("No content seed configured".to_string()),
        ),
        (true, true) => (HealthStatus::Healthy, None),
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub store: Arc<dyn ContentStore>,
    pub seeded: bool,
    pub started: Instant,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        message: None,
        details: None,
    })
}

/// GET /health/ready - Content store reachability and seed state
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Healthy, or degraded without a content seed", body = HealthResponse),
        (status = 503, description = "Content store is unreachable", body = HealthResponse),
    ),
)]
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let check = StoreCheck::run(state.store.as_ref()).await;
    let (status, message) = assess(&check, state.seeded);

    if status == HealthStatus::Unhealthy {
        tracing::warn!(error = ?check.error, "Readiness check failed");
    }

    let response = HealthResponse {
        status,
        message,
        details: Some(ReadinessDetails {
            content_store: check,
            seeded: state.seeded,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started.elapsed().as_secs(),
        }),
    };
    (status.status_code(), Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the health router; `seeded` records whether content was loaded at startup.
pub fn create_router(store: Arc<dyn ContentStore>, seeded: bool) -> Router {
    let state = Arc::new(HealthState {
        store,
        seeded,
        started: Instant::now(),
    });

    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

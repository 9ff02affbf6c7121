//! REST API Routes Module
//!
//! Includes:
//! - The content retrieval endpoint (`/rest/ejemplo`)
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for browser-based clients

pub mod ejemplo;
pub mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use ejemplo_storage::{ContentStore, Renderer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::constants::{CACHE_CONTEXTS_HEADER, CACHE_TAGS_HEADER};
use crate::openapi::ApiDoc;
use crate::telemetry::{metrics_handler, observability_middleware};

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers([
            header::CACHE_CONTROL,
            HeaderName::from_static(CACHE_TAGS_HEADER),
            HeaderName::from_static(CACHE_CONTEXTS_HEADER),
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - Content retrieval at `/rest/ejemplo`
/// - Health checks at `/health/*`
/// - Metrics at `/metrics`
/// - OpenAPI spec at `/openapi.json`
///
/// # Middleware Order (outer to inner)
/// 1. CORS - handles preflight requests
/// 2. HTTP trace layer
/// 3. Observability - span, metrics and completion log
pub fn create_api_router(
    store: Arc<dyn ContentStore>,
    renderer: Arc<dyn Renderer>,
    config: &ApiConfig,
) -> Router {
    Router::new()
        .merge(ejemplo::create_router(store.clone(), renderer, config))
        .nest(
            "/health",
            health::create_router(store, config.content_seed.is_some()),
        )
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}

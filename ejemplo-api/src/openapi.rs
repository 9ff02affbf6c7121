//! OpenAPI Specification for Ejemplo API
//!
//! This module defines the OpenAPI document for the Ejemplo REST API.
//! It uses utoipa to generate the OpenAPI specification from Rust types
//! and route annotations.

use utoipa::OpenApi;

use ejemplo_core::{ContentEntry, ResponsePayload};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{ejemplo, health};
use crate::routes::health::{HealthResponse, HealthStatus, ReadinessDetails, StoreCheck};
use crate::telemetry::metrics;

/// OpenAPI document for Ejemplo API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ejemplo API",
        description = "Read-only retrieval of published articles by node id and language, with cache metadata surfaced as response headers",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Content", description = "Rendered article retrieval"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        ejemplo::get_ejemplo,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            // === Payload Types ===
            ResponsePayload, ContentEntry,

            // === Error Types ===
            ApiError, ErrorCode,

            // === Health Types ===
            HealthResponse, HealthStatus, ReadinessDetails, StoreCheck
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}

//! Ejemplo API Server Entry Point
//!
//! Bootstraps configuration, loads the content store and starts the Axum
//! HTTP server.

use std::sync::Arc;

use axum::Router;
use ejemplo_api::telemetry::{init_tracing, TelemetryConfig};
use ejemplo_api::{create_api_router, ApiConfig, ApiError, ApiResult};
use ejemplo_storage::{BodyRenderer, ContentStore, InMemoryContentStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let config = ApiConfig::from_env()?;

    let store: Arc<dyn ContentStore> = match &config.content_seed {
        Some(path) => {
            let store = InMemoryContentStore::from_seed_file(path).map_err(|e| {
                ApiError::internal_error(format!(
                    "Failed to load content seed {}: {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::info!(seed = %path.display(), "Content store seeded");
            Arc::new(store)
        }
        None => {
            tracing::warn!("EJEMPLO_CONTENT_SEED not set, starting with an empty content store");
            Arc::new(InMemoryContentStore::new())
        }
    };

    let app: Router = create_api_router(store, Arc::new(BodyRenderer::new()), &config);

    let addr = config.bind_addr()?;
    tracing::info!(%addr, "Starting Ejemplo API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

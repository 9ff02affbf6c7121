//! Ejemplo API - Content Retrieval REST Layer
//!
//! Serves `GET /rest/ejemplo`: published articles selected by node id and
//! language, rendered and returned with their aggregated cache metadata.
//!
//! The request flows through four stages:
//! 1. [`validation`] normalizes the raw query into a [`Filter`](ejemplo_core::Filter)
//! 2. the content store runs the query built from that filter
//! 3. [`services`] reconciles requested ids against the result and renders
//! 4. [`routes::ejemplo`] turns the cache contract into response headers

pub mod config;
pub mod constants;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{reconcile, Retrieval, RetrievalService};
pub use validation::{normalize, NodeIdsParam, RawRetrievalParams};

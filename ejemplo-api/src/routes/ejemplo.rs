//! Content Retrieval Endpoint
//!
//! `GET /rest/ejemplo?node_ids=...&lang=...`
//!
//! Normalizes the query, runs the retrieval pipeline and answers with the
//! rendered payload. The aggregated cache contract of the response is
//! surfaced as `Cache-Control`, `X-Cache-Tags` and `X-Cache-Contexts`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ejemplo_core::{CacheContract, EjemploError, EjemploResult, MaxAge, ResponsePayload};
use ejemplo_storage::{ContentStore, Renderer};

use crate::config::ApiConfig;
use crate::constants::{
    CACHE_CONTEXTS_HEADER, CACHE_TAGS_HEADER, EJEMPLO_PATH, UNCACHEABLE_CACHE_CONTROL,
};
use crate::error::{ApiError, ApiResult};
use crate::services::{Retrieval, RetrievalService};
use crate::telemetry::{with_metrics, RetrievalOutcome};
use crate::validation::{normalize, RawRetrievalParams};

// ============================================================================
// STATE
// ============================================================================

/// Shared state for the retrieval endpoint.
#[derive(Clone)]
pub struct EjemploState {
    pub service: RetrievalService,
    pub default_language: String,
    pub page_cache_max_age_secs: u32,
}

impl EjemploState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        renderer: Arc<dyn Renderer>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            service: RetrievalService::new(store, renderer),
            default_language: config.default_language.clone(),
            page_cache_max_age_secs: config.page_cache_max_age_secs,
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /rest/ejemplo - Retrieve rendered articles
#[utoipa::path(
    get,
    path = "/rest/ejemplo",
    tag = "Content",
    params(
        ("node_ids" = String, Query, description = "Node id, repeated (`node_ids=5&node_ids=9`), bracketed (`node_ids[]=5`) or the literal `all`"),
        ("lang" = Option<String>, Query, description = "Content language (defaults to the site language)"),
    ),
    responses(
        (status = 200, description = "Rendered articles", body = ResponsePayload,
            headers(
                ("Cache-Control" = String, description = "Derived from the aggregated max-age"),
                ("X-Cache-Tags" = String, description = "Space-separated invalidation tags"),
                ("X-Cache-Contexts" = String, description = "Space-separated cache contexts"),
            )
        ),
        (status = 400, description = "Missing or invalid node_ids", body = ApiError),
        (status = 404, description = "Some requested nodes do not exist", body = ApiError),
        (status = 500, description = "Content store or renderer failure", body = ApiError),
    ),
)]
pub async fn get_ejemplo(
    State(state): State<Arc<EjemploState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let result = retrieve(&state, pairs).await;

    let outcome = match &result {
        Ok(_) => RetrievalOutcome::Ok,
        Err(EjemploError::Validation(_)) => RetrievalOutcome::Invalid,
        Err(EjemploError::NotFound { .. }) => RetrievalOutcome::NotFound,
        Err(_) => RetrievalOutcome::Internal,
    };
    with_metrics(|metrics| metrics.record_retrieval(outcome));

    let retrieval = result.map_err(|err| {
        if matches!(outcome, RetrievalOutcome::Invalid | RetrievalOutcome::NotFound) {
            tracing::warn!(error = %err, outcome = outcome.as_label(), "Retrieval rejected");
        }
        ApiError::from(err)
    })?;

    let headers = cache_headers(&retrieval.cache, state.page_cache_max_age_secs)?;
    Ok(payload_response(headers, retrieval.payload))
}

fn payload_response(headers: HeaderMap, payload: ResponsePayload) -> Response {
    (StatusCode::OK, headers, Json(payload)).into_response()
}

async fn retrieve(state: &EjemploState, pairs: Vec<(String, String)>) -> EjemploResult<Retrieval> {
    let params = RawRetrievalParams::from_pairs(pairs);
    let filter = normalize(&params, &state.default_language)?;
    tracing::debug!(
        stage = "normalized",
        all = filter.is_all(),
        ids = filter.identifiers.len(),
        language = %filter.language,
        "Request normalized"
    );

    state.service.execute(&filter).await
}

// ============================================================================
// CACHE HEADERS
// ============================================================================

/// `Cache-Control` value for an aggregated max-age.
///
/// Permanent content is cached for `page_max_age_secs`; zero seconds on
/// either path means the response must not be cached.
pub fn cache_control_value(max_age: MaxAge, page_max_age_secs: u32) -> String {
    let secs = match max_age {
        MaxAge::Permanent => page_max_age_secs,
        MaxAge::Seconds(secs) => secs,
    };
    if secs == 0 {
        UNCACHEABLE_CACHE_CONTROL.to_string()
    } else {
        format!("max-age={}, public", secs)
    }
}

/// Response headers carrying a cache contract.
///
/// `X-Cache-Tags` is omitted when there are no tags; contexts always
/// include the query-args context.
pub fn cache_headers(cache: &CacheContract, page_max_age_secs: u32) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        header_value(cache_control_value(cache.max_age(), page_max_age_secs))?,
    );

    if !cache.tags().is_empty() {
        headers.insert(
            HeaderName::from_static(CACHE_TAGS_HEADER),
            header_value(join(cache.tags()))?,
        );
    }
    headers.insert(
        HeaderName::from_static(CACHE_CONTEXTS_HEADER),
        header_value(join(cache.contexts()))?,
    );

    Ok(headers)
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

fn header_value(value: String) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(&value)
        .map_err(|e| ApiError::internal_error(format!("Invalid header value: {}", e)))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the retrieval router.
pub fn create_router(
    store: Arc<dyn ContentStore>,
    renderer: Arc<dyn Renderer>,
    config: &ApiConfig,
) -> Router {
    let state = Arc::new(EjemploState::new(store, renderer, config));

    Router::new()
        .route(EJEMPLO_PATH, get(get_ejemplo))
        .with_state(state)
}

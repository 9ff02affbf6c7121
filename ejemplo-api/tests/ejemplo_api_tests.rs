//! End-to-end tests for the content retrieval endpoint
//!
//! Requests go through the full router (middleware, CORS, handlers) with
//! an in-memory content store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use ejemplo_api::{create_api_router, ApiConfig};
use ejemplo_test_utils::fixtures::{article, mixed_store, node, store_with};
use ejemplo_test_utils::generators::{invalid_token, markup_token};
use ejemplo_test_utils::*;
use proptest::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn app_with(store: Arc<dyn ContentStore>, renderer: Arc<dyn Renderer>) -> Router {
    create_api_router(store, renderer, &ApiConfig::default())
}

fn app(store: InMemoryContentStore) -> (Router, Arc<InMemoryContentStore>) {
    let store = Arc::new(store);
    (app_with(store.clone(), Arc::new(BodyRenderer)), store)
}

async fn get(app: Router, uri: &str) -> Result<TestResponse, Box<dyn std::error::Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    let response = app.oneshot(request).await?;

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec())?,
    })
}

// ============================================================================
// RETRIEVAL
// ============================================================================

#[tokio::test]
async fn test_single_article_in_language() -> TestResult {
    let (app, _) = app(store_with([article(5, "en")]));
    let response = get(app, "/rest/ejemplo?node_ids=5&lang=en").await?;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["message"], "");
    assert_eq!(body["data"], json!([{ "titulo": "T5", "contenido": "B5" }]));
    assert!(body["time"].as_i64().unwrap_or_default() > 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_node_is_not_found() -> TestResult {
    let (app, _) = app(store_with([article(5, "en")]));
    let response = get(app, "/rest/ejemplo?node_ids=5&node_ids=9").await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let body = response.json()?;
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
    assert_eq!(body["message"], "Cannot find nodes: 9.");
    assert_eq!(body["details"]["missing"], json!([9]));
    Ok(())
}

#[tokio::test]
async fn test_missing_nodes_are_listed_in_order() -> TestResult {
    let (app, _) = app(store_with([article(5, "en")]));
    let response = get(app, "/rest/ejemplo?node_ids=12&node_ids=5&node_ids=9").await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()?["message"], "Cannot find nodes: 9, 12.");
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_value_is_rejected() -> TestResult {
    let (app, store) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=abc").await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json()?;
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["message"], "Invalid value \"abc\".");
    assert_eq!(store.query_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_all_on_empty_store() -> TestResult {
    let (app, store) = app(InMemoryContentStore::new());
    let response = get(app, "/rest/ejemplo?node_ids=all").await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["data"], json!([]));
    assert_eq!(response.header("x-cache-contexts"), Some("url.path.query_args"));
    assert_eq!(response.header("x-cache-tags"), None);
    assert_eq!(store.query_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_absent_node_ids() -> TestResult {
    let (app, store) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?lang=en").await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json()?;
    assert_eq!(body["code"], "MISSING_FIELD");
    assert_eq!(body["message"], "You must provide the nodes to get.");
    assert_eq!(store.query_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_node_ids_is_missing() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=").await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()?["code"], "MISSING_FIELD");
    Ok(())
}

#[tokio::test]
async fn test_all_returns_every_qualifying_article() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=all&lang=en").await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json()?["data"],
        json!([
            { "titulo": "T5", "contenido": "B5" },
            { "titulo": "T9", "contenido": "B9" }
        ])
    );
    assert_eq!(response.header("x-cache-tags"), Some("node:5 node:9"));
    Ok(())
}

#[tokio::test]
async fn test_bracket_form() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids%5B%5D=9&node_ids%5B%5D=5").await?;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["data"][0]["titulo"], "T5");
    assert_eq!(body["data"][1]["titulo"], "T9");
    Ok(())
}

#[tokio::test]
async fn test_language_defaults_to_english() -> TestResult {
    let (app, _) = app(mixed_store());

    let response = get(app.clone(), "/rest/ejemplo?node_ids=5").await?;
    assert_eq!(response.status, StatusCode::OK);

    let response = get(app.clone(), "/rest/ejemplo?node_ids=5&lang=").await?;
    assert_eq!(response.status, StatusCode::OK);

    // Article 7 only exists in Spanish.
    let response = get(app.clone(), "/rest/ejemplo?node_ids=7").await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = get(app, "/rest/ejemplo?node_ids=7&lang=es").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["data"][0]["titulo"], "T7");
    Ok(())
}

#[tokio::test]
async fn test_drafts_and_other_types_are_not_found() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=6&node_ids=8").await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()?["message"], "Cannot find nodes: 6, 8.");
    Ok(())
}

#[tokio::test]
async fn test_first_invalid_token_is_reported() -> TestResult {
    let (app, store) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=5&node_ids=x1&node_ids=0").await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()?["message"], "Invalid value \"x1\".");
    assert_eq!(store.query_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_markup_token_is_rejected_with_raw_value() -> TestResult {
    let (app, store) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=%3Cb%3E5%3C%2Fb%3E").await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()?["message"], "Invalid value \"<b>5</b>\".");
    assert_eq!(store.query_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_repeated_requests_are_identical_apart_from_time() -> TestResult {
    let (app, _) = app(mixed_store());

    let first = get(app.clone(), "/rest/ejemplo?node_ids=5&node_ids=9").await?;
    let second = get(app, "/rest/ejemplo?node_ids=5&node_ids=9").await?;

    let (first_body, second_body) = (first.json()?, second.json()?);
    assert_eq!(first_body["data"], second_body["data"]);
    assert_eq!(first_body["message"], second_body["message"]);
    for name in ["cache-control", "x-cache-tags", "x-cache-contexts"] {
        assert_eq!(first.header(name), second.header(name));
    }
    Ok(())
}

// ============================================================================
// CACHE HEADERS
// ============================================================================

#[tokio::test]
async fn test_permanent_content_uses_page_max_age() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/rest/ejemplo?node_ids=5").await?;

    assert_eq!(response.header("cache-control"), Some("max-age=3600, public"));
    assert_eq!(response.header("x-cache-tags"), Some("node:5"));
    Ok(())
}

#[tokio::test]
async fn test_strictest_max_age_wins() -> TestResult {
    let mut short = article(1, "en");
    short.item.cache = CacheMetadata::for_node(node(1)).with_max_age(MaxAge::Seconds(300));
    let mut uncacheable = article(2, "en");
    uncacheable.item.cache = CacheMetadata::for_node(node(2))
        .with_max_age(MaxAge::UNCACHEABLE)
        .with_context("user.roles");
    let (app, _) = app(store_with([short, uncacheable]));

    let response = get(app.clone(), "/rest/ejemplo?node_ids=1").await?;
    assert_eq!(response.header("cache-control"), Some("max-age=300, public"));

    let response = get(app, "/rest/ejemplo?node_ids=1&node_ids=2").await?;
    assert_eq!(response.header("cache-control"), Some("no-cache, private"));
    assert_eq!(
        response.header("x-cache-contexts"),
        Some("url.path.query_args user.roles")
    );
    Ok(())
}

#[tokio::test]
async fn test_error_responses_are_not_cached() -> TestResult {
    let (app, _) = app(mixed_store());

    for uri in ["/rest/ejemplo", "/rest/ejemplo?node_ids=abc", "/rest/ejemplo?node_ids=404"] {
        let response = get(app.clone(), uri).await?;
        assert!(response.status.is_client_error(), "{} should fail", uri);
        assert_eq!(response.header("cache-control"), Some("no-cache, private"));
        assert_eq!(response.header("x-cache-tags"), None);
    }
    Ok(())
}

// ============================================================================
// COLLABORATOR FAILURES
// ============================================================================

#[tokio::test]
async fn test_store_failure_is_internal_error() -> TestResult {
    let app = app_with(
        Arc::new(FailingContentStore::new("connection reset by peer")),
        Arc::new(BodyRenderer),
    );
    let response = get(app, "/rest/ejemplo?node_ids=5").await?;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()?["code"], "STORAGE_ERROR");
    assert!(!response.body.contains("connection reset"));
    Ok(())
}

#[tokio::test]
async fn test_renderer_failure_is_internal_error() -> TestResult {
    let app = app_with(Arc::new(mixed_store()), Arc::new(FailingRenderer));
    let response = get(app, "/rest/ejemplo?node_ids=5").await?;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()?["code"], "INTERNAL_ERROR");
    assert!(!response.body.contains("renderer failure"));
    Ok(())
}

// ============================================================================
// OPERATIONAL ENDPOINTS
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() -> TestResult {
    let (app, _) = app(mixed_store());

    let response = get(app.clone(), "/health/ping").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "pong");

    let response = get(app.clone(), "/health/live").await?;
    assert_eq!(response.status, StatusCode::OK);

    let response = get(app, "/health/ready").await?;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["details"]["content_store"]["reachable"], true);
    assert_eq!(body["details"]["seeded"], false);
    Ok(())
}

#[tokio::test]
async fn test_readiness_healthy_when_seeded() -> TestResult {
    let config = ApiConfig {
        content_seed: Some("content.json".into()),
        ..ApiConfig::default()
    };
    let app = create_api_router(Arc::new(mixed_store()), Arc::new(BodyRenderer), &config);
    let response = get(app, "/health/ready").await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_readiness_fails_with_unreachable_store() -> TestResult {
    let app = app_with(Arc::new(FailingContentStore::default()), Arc::new(BodyRenderer));
    let response = get(app, "/health/ready").await?;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()?["status"], "unhealthy");
    Ok(())
}

#[tokio::test]
async fn test_metrics_after_request() -> TestResult {
    let (app, _) = app(mixed_store());
    get(app.clone(), "/rest/ejemplo?node_ids=5").await?;

    let response = get(app, "/metrics").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("ejemplo_http_requests_total"));
    assert!(response.body.contains("ejemplo_retrievals_total"));
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_is_served() -> TestResult {
    let (app, _) = app(mixed_store());
    let response = get(app, "/openapi.json").await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()?["paths"]["/rest/ejemplo"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight() -> TestResult {
    let (app, _) = app(mixed_store());
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/rest/ejemplo")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any invalid or markup-laden token is answered with 400 naming it,
    /// and the store is never consulted.
    #[test]
    fn prop_invalid_tokens_never_reach_the_store(
        token in prop_oneof![invalid_token(), markup_token()]
    ) {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| TestCaseError::fail(format!("runtime: {}", e)))?;

        rt.block_on(async {
            let (app, store) = app(mixed_store());
            let uri = format!("/rest/ejemplo?node_ids={}&node_ids=5", urlencoding::encode(&token));
            let response = get(app, &uri)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(response.status, StatusCode::BAD_REQUEST);
            let body = response.json().map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&body["message"], &json!(format!("Invalid value \"{}\".", token)));
            prop_assert_eq!(store.query_count(), 0);
            Ok(())
        })?;
    }
}

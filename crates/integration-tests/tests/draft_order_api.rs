//! Integration tests for the draft order endpoint's request framing.
//!
//! Every request here fails (or completes, for the preflight) before the
//! pipeline would touch the database or Shopify, so the assertions cover
//! exactly the contract the storefront widget depends on: status codes, the
//! error envelope, and CORS headers.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use draft_order_integration_tests::app;

const ENDPOINT: &str = "/api/draft-orders";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(ENDPOINT)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "https://my-store.myshopify.com")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_empty_cart_is_rejected_with_400() {
    let response = app()
        .oneshot(post_json(
            r#"{"cart": {"items": []}, "shop": "my-store.myshopify.com"}"#,
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Cart is empty");
}

#[tokio::test]
async fn test_missing_cart_is_rejected_with_400() {
    let response = app()
        .oneshot(post_json(r#"{"shop": "my-store.myshopify.com"}"#))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Cart is empty");
}

#[tokio::test]
async fn test_malformed_json_is_rejected_with_400() {
    let response = app()
        .oneshot(post_json("{not json"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid JSON in request body");
}

// =============================================================================
// Identity resolution failures
// =============================================================================

#[tokio::test]
async fn test_missing_shop_is_rejected_with_401() {
    let response = app()
        .oneshot(post_json(
            r#"{"cart": {"items": [{"variant_id": 1, "quantity": 1}]}}"#,
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "No shop provided in session or request body");
}

#[tokio::test]
async fn test_unparseable_shop_is_rejected_with_401() {
    let response = app()
        .oneshot(post_json(
            r#"{"cart": {"items": [{"variant_id": 1, "quantity": 1}]}, "shop": "not a domain"}"#,
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// CORS and method framing
// =============================================================================

#[tokio::test]
async fn test_error_responses_reflect_the_request_origin() {
    let response = app()
        .oneshot(post_json(r#"{"cart": {"items": []}}"#))
        .await
        .expect("router responds");

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://my-store.myshopify.com")
    );
    assert_eq!(
        response
            .headers()
            .get(header::VARY)
            .and_then(|v| v.to_str().ok()),
        Some("Origin")
    );
}

#[tokio::test]
async fn test_preflight_returns_empty_204() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri(ENDPOINT)
        .header(header::ORIGIN, "https://my-store.myshopify.com")
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|v| v.to_str().ok()),
        Some("POST, OPTIONS")
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|v| v.to_str().ok()),
        Some("Content-Type, Authorization")
    );

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_preflight_without_origin_allows_any() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri(ENDPOINT)
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let request = Request::builder()
        .method("GET")
        .uri(ENDPOINT)
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_liveness_is_independent_of_dependencies() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .expect("valid request");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

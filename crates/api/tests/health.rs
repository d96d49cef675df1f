//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["query_slots_available"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

async fn preflight(app: axum::Router, uri: &str, method: &str) -> axum::http::HeaderMap {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", method)
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.headers().clone()
}

fn header<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .unwrap_or_else(|| panic!("Missing {name} header"))
        .to_str()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_surface_allows_any_origin_for_reads_only(pool: PgPool) {
    let app = common::build_test_app(pool);

    let headers = preflight(app, "/api/v1/public/widgets/stix-core-objects/number", "GET").await;

    assert_eq!(header(&headers, "access-control-allow-origin"), "*");
    let methods = header(&headers, "access-control-allow-methods");
    assert!(methods.contains("GET"), "got: {methods}");
    assert!(!methods.contains("POST"), "got: {methods}");
    assert!(headers.get("access-control-allow-credentials").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_surface_allows_configured_origin_and_routed_methods(pool: PgPool) {
    let app = common::build_test_app(pool);

    let headers = preflight(app, "/api/v1/public-dashboards/1", "PATCH").await;

    assert_eq!(
        header(&headers, "access-control-allow-origin"),
        "http://localhost:3000"
    );
    assert_eq!(header(&headers, "access-control-allow-credentials"), "true");
    let methods = header(&headers, "access-control-allow-methods");
    for method in ["GET", "POST", "PATCH", "DELETE"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
    assert!(!methods.contains("PUT"), "got: {methods}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_are_gzipped_when_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/health")
        .header("Accept-Encoding", "gzip")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(response.headers(), "content-encoding"), "gzip");
}

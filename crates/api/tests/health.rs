//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, TestContext};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = get(ctx.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = get(ctx.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn request_id_is_generated_and_propagated(pool: PgPool) {
    let ctx = TestContext::new(pool);

    let response = get(ctx.app(), "/health").await;
    let generated = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id should be set on responses");
    assert!(!generated.is_empty());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stored_media_is_served(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let dir = ctx.media.path().join("gallery");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("hello.txt"), b"hello").unwrap();

    let response = get(ctx.app(), "/media/gallery/hello.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_bytes(response).await, b"hello");

    let response = get(ctx.app(), "/media/gallery/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_passes_through_the_full_stack(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/projects")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

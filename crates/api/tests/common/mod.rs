#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use portico_api::config::ServerConfig;
use portico_api::router::build_app_router;
use portico_api::state::AppState;
use portico_core::storage::LocalStorage;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "portico-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        max_source_dimension: 4000,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// on top of `pool`, storing uploads under `media_root`.
pub fn build_test_app(pool: PgPool, media_root: &Path) -> Router {
    let config = test_config(media_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(LocalStorage::new(media_root)),
    };
    build_app_router(state, &config)
}

/// A database pool plus a temporary media root that lives as long as the
/// test. Each call to [`app`](Self::app) builds a fresh router over both.
pub struct TestContext {
    pub pool: PgPool,
    pub media: TempDir,
}

impl TestContext {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            media: TempDir::new().expect("create temp media root"),
        }
    }

    pub fn app(&self) -> Router {
        build_test_app(self.pool.clone(), self.media.path())
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.media.path())
    }

    /// Whether a stored path exists under the media root.
    pub fn stored(&self, path: &str) -> bool {
        self.media.path().join(path).exists()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Body::from(json.to_string()),
        Some("application/json".to_string()),
    )
    .await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::PUT,
        uri,
        Body::from(json.to_string()),
        Some("application/json".to_string()),
    )
    .await
}

/// One part of a multipart form.
pub enum Part {
    Payload(serde_json::Value),
    File {
        field: &'static str,
        filename: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    },
}

pub async fn post_multipart(app: Router, uri: &str, parts: Vec<Part>) -> Response<Body> {
    send_multipart(app, Method::POST, uri, parts).await
}

pub async fn put_multipart(app: Router, uri: &str, parts: Vec<Part>) -> Response<Body> {
    send_multipart(app, Method::PUT, uri, parts).await
}

async fn send_multipart(app: Router, method: Method, uri: &str, parts: Vec<Part>) -> Response<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Payload(json) => {
                body.extend_from_slice(
                    b"Content-Disposition: form-data; name=\"payload\"\r\n\r\n",
                );
                body.extend_from_slice(json.to_string().as_bytes());
            }
            Part::File {
                field,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    send(
        app,
        method,
        uri,
        Body::from(body),
        Some(format!("multipart/form-data; boundary={BOUNDARY}")),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Encode a solid-color RGB image of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn image_part(field: &'static str, filename: &'static str, data: Vec<u8>) -> Part {
    Part::File {
        field,
        filename,
        content_type: "image/png",
        data,
    }
}

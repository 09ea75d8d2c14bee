//! Shared helpers for API integration tests.
//!
//! Builds the full application router against the in-memory object
//! store, so tests exercise the same middleware stack (CORS, request
//! ID, timeout, tracing, panic recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use typevault_api::auth::jwt::{generate_access_token, JwtConfig};
use typevault_api::config::{ServerConfig, StorageBackend};
use typevault_api::router::build_app_router;
use typevault_api::state::AppState;
use typevault_storage::{MemoryStore, ObjectStore, UrlSigner};

/// Default authenticated user for tests.
pub const TEST_USER: i64 = 42;

/// A second user, for owner-scoping tests.
pub const OTHER_USER: i64 = 99;

const JWT_SECRET: &str = "test-jwt-secret";
const SIGNING_SECRET: &str = "test-signing-secret";
const BASE_URL: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 32 * 1024 * 1024,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        storage_backend: StorageBackend::Memory,
        public_base_url: BASE_URL.to_string(),
        url_signing_secret: SIGNING_SECRET.to_string(),
        signed_url_ttl_secs: 3600,
        max_concurrent_transcodes: 2,
        reconcile_interval_secs: 3600,
    }
}

/// The app under test plus handles the tests assert against.
pub struct TestApp {
    pub router: Router,
    /// Direct handle on the in-memory store, for blob assertions.
    pub store: Arc<MemoryStore>,
    /// The signer the app verifies `/assets` URLs with.
    pub signer: Arc<UrlSigner>,
    pub state: AppState,
}

/// Build the full application router with all middleware layers, using
/// the given database pool and a fresh in-memory object store.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let signer = Arc::new(UrlSigner::new(
        &config.url_signing_secret,
        &config.public_base_url,
    ));
    let store = Arc::new(MemoryStore::new(Arc::clone(&signer)));
    let state = AppState::new(
        pool,
        config.clone(),
        Arc::clone(&store) as Arc<dyn ObjectStore>,
        Arc::clone(&signer),
    );
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        store,
        signer,
        state,
    }
}

/// `Authorization` header value for the given user.
pub fn bearer(user_id: i64) -> String {
    let token = generate_access_token(user_id, &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

/// Unauthenticated GET.
pub async fn get(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Authenticated GET.
pub async fn get_authed(app: &TestApp, uri: &str, user_id: i64) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user_id))
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Authenticated POST with a JSON body.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Authenticated PUT with a JSON body.
pub async fn put_json(
    app: &TestApp,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Authenticated DELETE.
pub async fn delete_authed(app: &TestApp, uri: &str, user_id: i64) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user_id))
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Upload a font file through the multipart endpoint.
pub async fn upload(app: &TestApp, user_id: i64, file_name: &str, bytes: &[u8]) -> Response {
    let boundary = "typevault-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"font\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/fonts/upload")
        .header(header::AUTHORIZATION, bearer(user_id))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("response body should be UTF-8")
}

/// A minimal structurally valid sfnt (ttf) binary: two tables with
/// repetitive data so the WOFF conversion actually shrinks it. Not a
/// renderable font, so metadata extraction falls back to defaults.
pub fn sample_ttf() -> Vec<u8> {
    sample_sfnt(&0x0001_0000u32.to_be_bytes())
}

/// Same sfnt body with the 'OTTO' (CFF) version tag.
pub fn sample_otf() -> Vec<u8> {
    sample_sfnt(b"OTTO")
}

fn sample_sfnt(flavor: &[u8; 4]) -> Vec<u8> {
    let tables: &[(&[u8; 4], Vec<u8>)] = &[
        (b"glyf", vec![0xAB; 4096]),
        (b"head", vec![1, 2, 3, 4, 5, 6, 7, 8]),
    ];

    let n = tables.len();
    let mut out = Vec::new();
    out.extend_from_slice(flavor);
    out.extend_from_slice(&(n as u16).to_be_bytes());
    out.extend_from_slice(&[0u8; 6]); // searchRange/entrySelector/rangeShift

    let mut offset = 12 + n * 16;
    for (tag, body) in tables {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&0u32.to_be_bytes()); // checksum (unchecked)
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        offset += (body.len() + 3) & !3;
    }
    for (_, body) in tables {
        out.extend_from_slice(body);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

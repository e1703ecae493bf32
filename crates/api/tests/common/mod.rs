#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use atlas_api::auth::password::PasswordHasher;
use atlas_api::config::{DatabaseConfig, ServerConfig};
use atlas_api::router::build_app_router;
use atlas_api::state::AppState;
use atlas_db::models::account::CreateAccount;
use atlas_db::{AccountStore, MemoryStore, Stores};

pub const TEST_PEPPER: &str = "integration-test-pepper";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct";

/// Build a test `ServerConfig` with safe defaults.
///
/// The database settings are never used: tests run against [`MemoryStore`].
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            name: "unused".to_string(),
            max_connections: 1,
        },
        session_pepper: TEST_PEPPER.to_string(),
        secure_cookies: false,
        trust_proxy: false,
    }
}

/// Argon2id with minimal cost so tests stay fast.
pub fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("cheap params are valid")
}

/// A router over an in-memory store, plus the store for seeding and inspection.
pub struct TestApp {
    pub app: Router,
    pub store: MemoryStore,
}

/// Build the full application router (same middleware stack as production)
/// over a fresh in-memory store holding one admin account.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(test_config()).await
}

pub async fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = MemoryStore::new();
    seed_account(&store, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let state = AppState::new(config, Stores::memory(store.clone()), cheap_hasher())
        .expect("test pepper is valid");

    TestApp {
        app: build_app_router(state),
        store,
    }
}

pub async fn seed_account(store: &MemoryStore, username: &str, password: &str) {
    let password_hash = cheap_hasher().hash(password).expect("hashing should succeed");
    store
        .create_account(&CreateAccount {
            username: username.to_string(),
            password_hash,
            roles: vec!["admin".to_string()],
        })
        .await
        .expect("account creation should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = cookie {
        builder = builder.header(COOKIE, format!("admin_session={token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_with_cookie(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_with_cookie(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn post_with_cookie(app: &Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    send(app, request(Method::POST, uri, None, None)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The raw `Set-Cookie` header of a response.
pub fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap()
        .to_string()
}

/// Extract the token value from an `admin_session` `Set-Cookie` header.
pub fn cookie_token(set_cookie: &str) -> String {
    set_cookie
        .strip_prefix("admin_session=")
        .and_then(|rest| rest.split(';').next())
        .expect("admin_session cookie")
        .to_string()
}

/// Log in through the API and return the raw session token.
pub async fn login_as(app: &Router, username: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_token(&set_cookie(&response))
}

pub async fn login_admin(app: &Router) -> String {
    login_as(app, ADMIN_USERNAME, ADMIN_PASSWORD).await
}

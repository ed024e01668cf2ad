#![allow(dead_code)]

//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are driven straight through the router with
//! `tower::ServiceExt::oneshot`, no TCP listener involved. The router is
//! built by the same [`build_app_router`] the binary uses, and every test
//! database is seeded the same way startup is.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use faqdesk_api::auth::password::hash_password;
use faqdesk_api::bootstrap;
use faqdesk_api::config::ServerConfig;
use faqdesk_api::router::build_app_router;
use faqdesk_api::state::AppState;
use faqdesk_db::models::user::CreateUser;
use faqdesk_db::repositories::UserRepo;

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        admin_user: "admin".to_string(),
        admin_password: "admin".to_string(),
        session_ttl_hours: 168,
    }
}

/// Build the full application router over the given pool, seeded exactly
/// like production startup (root category, default admin).
pub async fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    bootstrap::seed_defaults(&pool, &config)
        .await
        .expect("seeding should succeed");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a request with an optional session cookie and optional JSON body.
pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    request(app, Method::GET, uri, cookie, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    request(app, Method::POST, uri, cookie, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    request(app, Method::PUT, uri, cookie, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    request(app, Method::DELETE, uri, cookie, None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Extract the `faq_session=<token>` pair from a login response's
/// `Set-Cookie` header, ready to echo back in a `Cookie` header.
pub fn session_cookie_from(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should carry Set-Cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair should be present")
        .to_string()
}

/// Create a user at the given permission level directly in the database and
/// log them in through the API. Returns the session cookie pair.
pub async fn login_as(app: &Router, pool: &SqlitePool, name: &str, level: i64) -> String {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            password_hash: hashed,
            permission_level: level,
        },
    )
    .await
    .expect("user creation should succeed");

    login(app, name, TEST_PASSWORD).await
}

/// Log in through the API and return the session cookie pair.
pub async fn login(app: &Router, name: &str, password: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": name, "password": password }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_cookie_from(&response)
}

/// Log in as the seeded default admin.
pub async fn login_admin(app: &Router) -> String {
    login(app, "admin", "admin").await
}

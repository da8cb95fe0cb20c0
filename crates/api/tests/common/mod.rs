#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use carebook_api::auth::jwt::{issue_token, JwtConfig};
use carebook_api::config::ServerConfig;
use carebook_api::router::build_app_router;
use carebook_api::state::AppState;
use carebook_core::roles::{ROLE_ADMIN, ROLE_CLINICIAN, ROLE_STAFF};
use carebook_db::store::memory::MemoryStore;

pub const ADMIN_ID: i64 = 1;
pub const CLINICIAN_ID: i64 = 2;
pub const STAFF_ID: i64 = 3;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: "carebook-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router on a fresh in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    let state = AppState::new(test_config(), Arc::new(MemoryStore::new()));
    build_app_router(state)
}

fn token_for(user_id: i64, role: &str) -> String {
    issue_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token_for(ADMIN_ID, ROLE_ADMIN)
}

pub fn clinician_token() -> String {
    token_for(CLINICIAN_ID, ROLE_CLINICIAN)
}

pub fn staff_token() -> String {
    token_for(STAFF_ID, ROLE_STAFF)
}

/// Send a request through the router, optionally authenticated and with a
/// JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a client through the API and return its id.
pub async fn create_client(app: &Router, first_name: &str, last_name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/clients",
        &staff_token(),
        serde_json::json!({ "first_name": first_name, "last_name": last_name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a waitlist entry through the API and return the `data` payload.
pub async fn create_entry(app: &Router, body: Value) -> Value {
    let response = post_json(app.clone(), "/api/v1/waitlist", &staff_token(), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

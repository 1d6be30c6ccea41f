#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use panchayat_core::validation::files::FileLimits;
use serde_json::{json, Value};
use tower::ServiceExt;

use panchayat_api::auth::jwt::{generate_access_token, JwtConfig};
use panchayat_api::config::ServerConfig;
use panchayat_api::router::build_app_router;
use panchayat_api::state::AppState;

const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        file_limits: FileLimits::default(),
    }
}

/// Build the full application router with a fresh, empty store.
pub fn build_test_app() -> Router {
    build_test_app_with_state().0
}

/// Like [`build_test_app`], also returning the state so a test can send
/// several requests against the same store.
pub fn build_test_app_with_state() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(config.clone());
    (build_app_router(state.clone(), &config), state)
}

/// Rebuild a router over existing state (routers are consumed by `oneshot`).
pub fn app_for(state: &AppState) -> Router {
    build_app_router(state.clone(), &test_config())
}

/// A valid bearer token for `user_id` with `role`.
pub fn token(user_id: &str, role: &str) -> String {
    let config = test_config();
    generate_access_token(user_id, role, &config.jwt).expect("token generation should succeed")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// A complete, valid birth-certificate form (home birth).
pub fn birth_form() -> Value {
    json!({
        "child_name": "  Baby   Lakshmi ",
        "birth_date": "2024-01-10",
        "gender": "female",
        "place_of_birth": "home",
        "father_name": "Ravi Kumar",
        "mother_name": "Meena Devi",
        "applicant_mobile": "+91 98765 43210",
        "applicant_email": " Ravi@Example.COM ",
        "address": "12 Temple Street, Hosur",
        "pincode": "635109"
    })
}

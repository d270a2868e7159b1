//! HTTP surface tests against a router whose stores are unreachable.
//! Everything here must be decided before any store call.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use deadpool_redis::Runtime;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use ringpass_auth::router::build_router;
use ringpass_auth::state::AppState;
use ringpass_auth_types::token::SessionTokenIssuer;
use ringpass_domain::id::UserId;
use ringpass_testing::auth::{MockAuth, TEST_JWT_SECRET};

use crate::helpers::settings;

fn server() -> TestServer {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(Runtime::Tokio1))
        .unwrap();
    let state = AppState {
        db: DatabaseConnection::default(),
        redis,
        tokens: Arc::new(SessionTokenIssuer::new(TEST_JWT_SECRET.as_bytes())),
        otp: settings(),
        store_timeout: Duration::from_millis(500),
        request_timeout: Duration::from_secs(10),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_probe() {
    let resp = server().get("/healthz").await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_when_stores_are_down() {
    let resp = server().get("/readyz").await;
    resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_request_with_empty_phone() {
    let resp = server()
        .post("/otp/request")
        .json(&json!({ "phone": "" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let resp = server()
        .post("/otp/request")
        .content_type("application/json")
        .text("{\"phone\":")
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn should_reject_verify_without_otp() {
    let resp = server()
        .post("/otp/verify")
        .json(&json!({ "phone": "+15551234567" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_fail_closed_when_redis_is_down() {
    let resp = server()
        .post("/otp/request")
        .json(&json!({ "phone": "+15551234567" }))
        .await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INTERNAL");
    assert_eq!(body["message"], "internal error");
}

#[tokio::test]
async fn should_require_authorization_header_for_users() {
    for path in ["/users", "/users/me", "/users/1"] {
        let resp = server().get(path).await;
        resp.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = resp.json();
        assert_eq!(body["kind"], "MISSING_AUTHORIZATION", "path {path}");
    }
}

#[tokio::test]
async fn should_reject_non_bearer_authorization() {
    let resp = server()
        .get("/users")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Token abc"),
        )
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_AUTHORIZATION_FORMAT");
}

#[tokio::test]
async fn should_reject_token_signed_with_another_secret() {
    let (name, value) = MockAuth::with_secret(UserId(1), "some-other-secret").header();
    let resp = server().get("/users/me").add_header(name, value).await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_TOKEN");
}

#[tokio::test]
async fn should_reject_non_numeric_user_id() {
    let (name, value) = MockAuth::new(UserId(1)).header();
    let resp = server().get("/users/abc").add_header(name, value).await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

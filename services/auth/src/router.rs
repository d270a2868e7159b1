use axum::{
    Router,
    routing::{get, post},
};

use ringpass_core::health::healthz;
use ringpass_core::middleware::{request_id_layer, timeout_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    otp::{request_code, verify_code},
    users::{get_me, get_user, list_users},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // One-time codes
        .route("/otp/request", post(request_code))
        .route("/otp/verify", post(verify_code))
        // Users (bearer token required)
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/{id}", get(get_user))
        .layer(timeout_layer(request_timeout))
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}

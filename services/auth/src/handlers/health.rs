use axum::{extract::State, http::StatusCode};

use crate::infra::bounded;
use crate::infra::connect::ping_redis;
use crate::state::AppState;

/// Handler for `GET /readyz`: 200 only when both Postgres and Redis answer.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let postgres = bounded(state.store_timeout, "postgres ping", state.db.ping()).await;
    let postgres_ok = matches!(postgres, Ok(Ok(())));
    let redis_ok = ping_redis(&state.redis, state.store_timeout).await.is_ok();

    if postgres_ok && redis_ok {
        StatusCode::OK
    } else {
        tracing::warn!(postgres = postgres_ok, redis = redis_ok, "not ready");
        StatusCode::SERVICE_UNAVAILABLE
    }
}

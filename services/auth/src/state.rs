use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use ringpass_auth_types::token::SessionTokenIssuer;

use crate::domain::types::OtpSettings;
use crate::infra::cache::{RedisCodeStore, RedisRateLimiter};
use crate::infra::db::DbUserRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub tokens: Arc<SessionTokenIssuer>,
    pub otp: OtpSettings,
    /// Deadline for each individual store call.
    #[from_ref(skip)]
    pub store_timeout: Duration,
    /// Deadline for a whole HTTP request.
    #[from_ref(skip)]
    pub request_timeout: Duration,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
            deadline: self.store_timeout,
        }
    }

    pub fn code_store(&self) -> RedisCodeStore {
        RedisCodeStore {
            pool: self.redis.clone(),
            deadline: self.store_timeout,
        }
    }

    pub fn rate_limiter(&self) -> RedisRateLimiter {
        RedisRateLimiter {
            pool: self.redis.clone(),
            deadline: self.store_timeout,
        }
    }
}

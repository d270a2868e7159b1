#![allow(async_fn_in_trait)]

use std::time::Duration;

use ringpass_domain::id::UserId;

use crate::domain::types::{User, UserPage};
use crate::error::AuthServiceError;

/// Produces one-time codes from a secure source.
pub trait CodeGenerator: Send + Sync {
    /// Fails with `Internal` if the entropy source is unavailable.
    fn generate(&self) -> Result<String, AuthServiceError>;
}

/// Fixed-window request counter, keyed by phone.
pub trait RateLimiter: Send + Sync {
    /// Count this request against `phone` and report whether it is within
    /// `max` for the current window. The window starts with the first
    /// request and is not extended by later ones.
    async fn allow(
        &self,
        phone: &str,
        max: u32,
        window: Duration,
    ) -> Result<bool, AuthServiceError>;
}

/// Pending one-time codes, at most one per phone.
pub trait CodeStore: Send + Sync {
    /// Store `code` for `phone`, replacing any pending code and resetting its TTL.
    async fn save(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), AuthServiceError>;

    /// Atomically compare and, on match, delete the pending code.
    ///
    /// Returns `false` for a mismatch, a missing code, or an expired one.
    /// A mismatch leaves the pending code in place.
    async fn verify_and_consume(&self, phone: &str, code: &str)
    -> Result<bool, AuthServiceError>;
}

/// Durable user identities.
pub trait UserRepository: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AuthServiceError>;

    /// Insert a new user. Fails with `PhoneTaken` if the phone already exists.
    async fn create(&self, phone: &str) -> Result<User, AuthServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError>;

    /// Users whose phone contains `search` (all users when empty), ordered by id.
    async fn list(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> Result<UserPage, AuthServiceError>;
}

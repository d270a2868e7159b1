//! Bearer credential helpers for HTTP tests.
//!
//! Protected routes authenticate `Authorization: Bearer <token>`. `MockAuth`
//! mints real session tokens with a test secret so requests pass the same
//! validation as production traffic.

use http::{HeaderName, HeaderValue, header::AUTHORIZATION};

use ringpass_auth_types::token::SessionTokenIssuer;
use ringpass_domain::id::UserId;

/// Secret shared by the test app state and [`MockAuth`].
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    issuer: SessionTokenIssuer,
}

impl MockAuth {
    pub fn new(user_id: UserId) -> Self {
        Self::with_secret(user_id, TEST_JWT_SECRET)
    }

    /// Sign with a different secret, e.g. to exercise rejection paths.
    pub fn with_secret(user_id: UserId, secret: &str) -> Self {
        Self {
            user_id,
            issuer: SessionTokenIssuer::new(secret.as_bytes()),
        }
    }

    pub fn token(&self) -> String {
        self.issuer
            .issue(self.user_id)
            .expect("test token signing")
            .token
    }

    /// The `Authorization` header as a client would send it.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token()))
            .expect("token is valid header text");
        (AUTHORIZATION, value)
    }
}

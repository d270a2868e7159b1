//! `Authorization: Bearer <token>` extractor.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use ringpass_domain::id::UserId;

use crate::token::SessionTokenIssuer;

/// Identity of the caller, proven by a valid session token.
///
/// The state must expose an `Arc<SessionTokenIssuer>` through [`FromRef`].
#[derive(Debug, Clone, Copy)]
pub struct BearerIdentity {
    pub user_id: UserId,
}

/// Why a request was refused authentication. Always 401.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("invalid authorization format")]
    InvalidFormat,
    #[error("invalid token")]
    InvalidToken,
}

impl TokenRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MISSING_AUTHORIZATION",
            Self::InvalidFormat => "INVALID_AUTHORIZATION_FORMAT",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Split `Bearer <token>`; the scheme is matched case-insensitively.
fn bearer_token(header: &str) -> Result<&str, TokenRejection> {
    let (scheme, token) = header
        .split_once(' ')
        .ok_or(TokenRejection::InvalidFormat)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(TokenRejection::InvalidFormat);
    }
    Ok(token)
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    Arc<SessionTokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TokenRejection;

    // Validation is synchronous; resolve it before building the future so the
    // returned future borrows nothing from `parts` or `state`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let issuer = Arc::<SessionTokenIssuer>::from_ref(state);

        let result = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(TokenRejection::MissingHeader)
            .and_then(|v| v.to_str().map_err(|_| TokenRejection::InvalidFormat))
            .and_then(bearer_token)
            .and_then(|token| {
                issuer.validate(token).map_err(|e| {
                    tracing::debug!(error = %e, "rejected session token");
                    TokenRejection::InvalidToken
                })
            })
            .map(|user_id| Self { user_id });

        async move { result }
    }
}

//! Session token issuance and validation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use ringpass_domain::id::UserId;

/// Session token lifetime in seconds (24 hours, fixed).
pub const SESSION_TOKEN_TTL_SECS: u64 = 86_400;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors returned by [`SessionTokenIssuer`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID as a decimal string |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

/// A freshly minted token and its absolute expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds since UNIX epoch.
    pub expires_at: u64,
}

/// Mints and validates HS256 session tokens.
///
/// Built once at startup from the configured secret and shared read-only
/// (behind `Arc`) for the lifetime of the process. The key is never rotated.
pub struct SessionTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `user_id`, expiring 24 hours from now.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.issue_with_expiry(user_id, get_current_timestamp() + SESSION_TOKEN_TTL_SECS)
    }

    fn issue_with_expiry(&self, user_id: UserId, exp: u64) -> Result<IssuedToken, TokenError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp,
        };
        let token =
            encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(TokenError::Signing)?;
        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    /// Validate signature, algorithm and expiry, returning the subject.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnexpectedAlgorithm
                }
                _ => TokenError::Malformed,
            },
        )?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Malformed)
    }
}

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::handlers::users::UserResponse;
use crate::infra::rng::OsRngCodeGenerator;
use crate::state::AppState;
use crate::usecase::otp::{RequestCodeInput, RequestCodeUseCase};
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

// ── POST /otp/request ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestCodeRequest {
    #[serde(default)]
    pub phone: String,
}

#[derive(Serialize)]
pub struct RequestCodeResponse {
    pub status: &'static str,
}

pub async fn request_code(
    State(state): State<AppState>,
    body: Result<Json<RequestCodeRequest>, JsonRejection>,
) -> Result<Json<RequestCodeResponse>, AuthServiceError> {
    let Json(body) = body.map_err(|_| AuthServiceError::InvalidRequest)?;
    let usecase = RequestCodeUseCase {
        limiter: state.rate_limiter(),
        codes: state.code_store(),
        generator: OsRngCodeGenerator,
        settings: state.otp,
    };
    usecase
        .execute(RequestCodeInput { phone: body.phone })
        .await?;
    Ok(Json(RequestCodeResponse {
        status: "otp_generated",
    }))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub token: String,
    /// Seconds since UNIX epoch.
    pub expires_at: u64,
    pub user: UserResponse,
}

pub async fn verify_code(
    State(state): State<AppState>,
    body: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<Json<VerifyCodeResponse>, AuthServiceError> {
    let Json(body) = body.map_err(|_| AuthServiceError::InvalidRequest)?;
    let usecase = VerifyCodeUseCase {
        codes: state.code_store(),
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let out = usecase
        .execute(VerifyCodeInput {
            phone: body.phone,
            code: body.otp,
        })
        .await?;
    Ok(Json(VerifyCodeResponse {
        token: out.token.token,
        expires_at: out.token.expires_at,
        user: out.user.into(),
    }))
}

use std::sync::Arc;

use anyhow::Context as _;

use ringpass_auth_types::token::{IssuedToken, SessionTokenIssuer};

use crate::domain::repository::{CodeStore, UserRepository};
use crate::domain::types::{User, validate_phone};
use crate::error::AuthServiceError;

pub struct VerifyCodeInput {
    pub phone: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub user: User,
    pub token: IssuedToken,
    /// True when this verification registered the user.
    pub created: bool,
}

pub struct VerifyCodeUseCase<C, U>
where
    C: CodeStore,
    U: UserRepository,
{
    pub codes: C,
    pub users: U,
    pub tokens: Arc<SessionTokenIssuer>,
}

impl<C, U> VerifyCodeUseCase<C, U>
where
    C: CodeStore,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<VerifyCodeOutput, AuthServiceError> {
        if !validate_phone(&input.phone) || input.code.is_empty() {
            return Err(AuthServiceError::InvalidRequest);
        }

        // Wrong, missing and expired codes are indistinguishable to the caller.
        if !self
            .codes
            .verify_and_consume(&input.phone, &input.code)
            .await?
        {
            return Err(AuthServiceError::InvalidOtp);
        }

        let (user, created) = find_or_create_user(&self.users, &input.phone).await?;
        let token = self
            .tokens
            .issue(user.id)
            .context("issue session token")?;

        tracing::info!(user_id = %user.id, created, "otp verified");
        Ok(VerifyCodeOutput {
            user,
            token,
            created,
        })
    }
}

/// Return the user for `phone`, registering it if absent.
///
/// Concurrent first-time calls for the same phone all resolve to the single
/// row that won the unique constraint.
pub async fn find_or_create_user<U: UserRepository>(
    users: &U,
    phone: &str,
) -> Result<(User, bool), AuthServiceError> {
    if let Some(user) = users.find_by_phone(phone).await? {
        return Ok((user, false));
    }

    match users.create(phone).await {
        Ok(user) => Ok((user, true)),
        Err(AuthServiceError::PhoneTaken) => {
            tracing::debug!("concurrent registration won, re-reading user");
            let user = users
                .find_by_phone(phone)
                .await?
                .context("user missing after unique violation")?;
            Ok((user, false))
        }
        Err(e) => Err(e),
    }
}

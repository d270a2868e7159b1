use crate::domain::repository::{CodeGenerator, CodeStore, RateLimiter};
use crate::domain::types::{OtpSettings, validate_phone};
use crate::error::AuthServiceError;

pub struct RequestCodeInput {
    pub phone: String,
}

pub struct RequestCodeUseCase<L, C, G>
where
    L: RateLimiter,
    C: CodeStore,
    G: CodeGenerator,
{
    pub limiter: L,
    pub codes: C,
    pub generator: G,
    pub settings: OtpSettings,
}

impl<L, C, G> RequestCodeUseCase<L, C, G>
where
    L: RateLimiter,
    C: CodeStore,
    G: CodeGenerator,
{
    pub async fn execute(&self, input: RequestCodeInput) -> Result<(), AuthServiceError> {
        let phone = input.phone.as_str();
        if !validate_phone(phone) {
            return Err(AuthServiceError::InvalidRequest);
        }

        // Counted before generation, so rejected requests still use up the window.
        let allowed = self
            .limiter
            .allow(
                phone,
                self.settings.rate_limit_max,
                self.settings.rate_limit_window,
            )
            .await?;
        if !allowed {
            tracing::info!(phone, "otp request rate limited");
            return Err(AuthServiceError::RateLimited);
        }

        let code = self.generator.generate()?;
        self.codes.save(phone, &code, self.settings.code_ttl).await?;

        if self.settings.log_codes {
            tracing::debug!(phone, code = %code, "otp generated");
        } else {
            tracing::info!(phone, "otp generated");
        }
        Ok(())
    }
}

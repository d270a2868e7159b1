use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use ringpass_core::config::Config;

use crate::domain::types::OtpSettings;

/// Auth service configuration loaded from environment variables.
///
/// Each field maps to the upper-cased variable of the same name
/// (`database_url` ← `DATABASE_URL`).
#[derive(Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis address, `host:port` or a full `redis://` URL.
    pub redis_addr: String,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8080).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Lifetime of a pending one-time code (default 120).
    #[serde(default = "default_otp_ttl_seconds")]
    pub otp_ttl_seconds: u64,
    /// Code requests allowed per phone per window (default 3).
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    /// Rate-limit window length (default 600).
    #[serde(default = "default_rate_limit_window_seconds")]
    pub rate_limit_window_seconds: u64,
    /// Upper bound on any single Redis or Postgres call (default 3000).
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// Upper bound on handling one HTTP request (default 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long in-flight requests get to finish after SIGTERM (default 10).
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    /// Write generated codes to the debug log. Development only.
    #[serde(default)]
    pub otp_log_codes: bool,
}

fn default_port() -> u16 {
    8080
}

fn default_otp_ttl_seconds() -> u64 {
    120
}

fn default_rate_limit_max() -> u32 {
    3
}

fn default_rate_limit_window_seconds() -> u64 {
    600
}

fn default_store_timeout_ms() -> u64 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

impl Config for AuthConfig {}

impl AuthConfig {
    /// Reject values that would leave the service unable to do its job.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.jwt_secret.is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(self.otp_ttl_seconds > 0, "OTP_TTL_SECONDS must be positive");
        anyhow::ensure!(self.rate_limit_max > 0, "RATE_LIMIT_MAX must be positive");
        anyhow::ensure!(
            self.rate_limit_window_seconds > 0,
            "RATE_LIMIT_WINDOW_SECONDS must be positive"
        );
        anyhow::ensure!(self.store_timeout_ms > 0, "STORE_TIMEOUT_MS must be positive");
        anyhow::ensure!(
            self.request_timeout_secs > 0,
            "REQUEST_TIMEOUT_SECS must be positive"
        );
        Ok(())
    }

    pub fn redis_url(&self) -> String {
        if self.redis_addr.contains("://") {
            self.redis_addr.clone()
        } else {
            format!("redis://{}", self.redis_addr)
        }
    }

    pub fn otp_settings(&self) -> OtpSettings {
        OtpSettings {
            code_ttl: Duration::from_secs(self.otp_ttl_seconds),
            rate_limit_max: self.rate_limit_max,
            rate_limit_window: Duration::from_secs(self.rate_limit_window_seconds),
            log_codes: self.otp_log_codes,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

// Connection URLs may embed credentials.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("database_url", &"<redacted>")
            .field("redis_addr", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("port", &self.port)
            .field("otp_ttl_seconds", &self.otp_ttl_seconds)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window_seconds", &self.rate_limit_window_seconds)
            .field("store_timeout_ms", &self.store_timeout_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .field("otp_log_codes", &self.otp_log_codes)
            .finish()
    }
}

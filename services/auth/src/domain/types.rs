use std::time::Duration;

use chrono::{DateTime, Utc};

use ringpass_domain::id::UserId;

/// Number of decimal digits in a one-time code.
pub const OTP_CODE_LEN: usize = 6;

/// A registered identity. Created on first successful verification of a phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

/// One page of a user listing plus the count of all matching rows.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: u64,
}

/// Knobs for code issuance, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct OtpSettings {
    pub code_ttl: Duration,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    /// Emit generated codes at debug level. Never enable in production.
    pub log_codes: bool,
}

/// Phones are opaque keys; only blank input is refused.
pub fn validate_phone(phone: &str) -> bool {
    !phone.trim().is_empty()
}

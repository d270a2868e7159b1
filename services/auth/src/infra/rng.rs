use anyhow::Context as _;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::repository::CodeGenerator;
use crate::domain::types::OTP_CODE_LEN;
use crate::error::AuthServiceError;

/// Largest multiple of 10 that fits in a byte. Bytes at or above it are
/// discarded so `byte % 10` stays uniform.
const REJECT_FROM: u8 = 250;

/// Draws codes from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngCodeGenerator;

impl CodeGenerator for OsRngCodeGenerator {
    fn generate(&self) -> Result<String, AuthServiceError> {
        let code = generate_code(&mut OsRng).context("os entropy source unavailable")?;
        Ok(code)
    }
}

/// `OTP_CODE_LEN` uniformly distributed decimal digits drawn from `rng`.
pub fn generate_code<R: RngCore>(rng: &mut R) -> Result<String, rand::Error> {
    let mut code = String::with_capacity(OTP_CODE_LEN);
    let mut buf = [0u8; 16];
    while code.len() < OTP_CODE_LEN {
        rng.try_fill_bytes(&mut buf)?;
        for b in buf.iter().copied().filter(|b| *b < REJECT_FROM) {
            code.push(char::from(b'0' + b % 10));
            if code.len() == OTP_CODE_LEN {
                break;
            }
        }
    }
    Ok(code)
}

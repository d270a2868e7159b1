use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff schedule for startup connection attempts.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

/// Run `op` until it succeeds or `policy.max_attempts` is exhausted, doubling
/// the delay after every failure. Returns the last error.
///
/// Startup only; request handlers never retry store calls.
pub async fn retry_with_backoff<T, E, F, Fut>(
    name: &str,
    policy: Backoff,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => return Err(e),
            Err(e) => {
                tracing::warn!(service = name, attempt, error = %e, "{name} not ready, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

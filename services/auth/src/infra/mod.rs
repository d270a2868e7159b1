use std::future::Future;
use std::time::Duration;

use crate::error::AuthServiceError;

pub mod cache;
pub mod connect;
pub mod db;
pub mod rng;

/// Await `fut`, failing with `Internal` once `deadline` elapses.
pub(crate) async fn bounded<F: Future>(
    deadline: Duration,
    op: &'static str,
    fut: F,
) -> Result<F::Output, AuthServiceError> {
    tokio::time::timeout(deadline, fut).await.map_err(|_| {
        AuthServiceError::Internal(anyhow::anyhow!("{op} timed out after {deadline:?}"))
    })
}

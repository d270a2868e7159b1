//! Service plumbing shared by Ringpass binaries: configuration loading,
//! tracing setup, HTTP middleware, health probes, startup retry and shutdown.

pub mod config;
pub mod health;
pub mod middleware;
pub mod retry;
pub mod serde;
pub mod shutdown;
pub mod tracing;

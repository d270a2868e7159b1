//! Session token types shared across Ringpass crates.
//!
//! Provides the HS256 session token issuer and the `BearerIdentity` extractor.

pub mod bearer;
pub mod token;

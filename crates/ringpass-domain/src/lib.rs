//! Domain types shared across Ringpass crates.
//!
//! Plain types with no framework dependencies: identifiers and pagination.
//! Used by every layer, from request parsing through to the stores.

pub mod id;
pub mod pagination;

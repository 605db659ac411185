//! EdgeGrid-authenticated access to the management API
//!
//! Credentials come from an `.edgerc` section (or the `AKAMAI_*` environment
//! variables), every request is signed with `EG1-HMAC-SHA256`, and responses
//! are decoded with serde.

pub mod client;
pub mod config;
pub mod signer;

pub use client::{ApiError, EdgeGridClient};
pub use config::Credentials;

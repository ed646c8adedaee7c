//! Error type definitions for the token service
//!
//! Client-visible token errors are kept distinct from operational store
//! failures so the upstream HTTP layer can map them to status codes.

use thiserror::Error;

/// Failures surfaced by the column store collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("column store request failed: {message}")]
    Backend { message: String },

    #[error("column `{column}` holds malformed data")]
    Corrupt { column: String },
}

/// Token validation and lifecycle errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// The opaque string cannot be parsed or its signature does not verify
    #[error("bad token: {reason}")]
    BadToken { reason: String },

    /// The token's absolute expiration has passed
    #[error("token expired {elapsed_ms} milliseconds ago")]
    ExpiredToken { elapsed_ms: i64 },

    /// Well-formed and correctly signed, but no record underlies it
    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },

    /// Operational failure against the column store, surfaced as-is
    #[error(transparent)]
    Store(#[from] StoreError),
}

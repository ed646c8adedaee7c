//! # Tokend Core
//!
//! Core logic of the tokend service: opaque bearer tokens that are
//! verifiable without shared session state. A token encodes a time-ordered
//! identifier, an optional absolute expiration, and a keyed signature; a
//! companion record in a wide-column store carries the principal, opaque
//! state, and activity timestamps under a bounded TTL.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AuthPrincipalInfo, AuthPrincipalType, TokenCategory, TokenInfo, BASE64_PREFIX_LENGTH,
    TOKEN_TYPE_ACCESS,
};
pub use errors::{StoreError, TokenError};
pub use repositories::{Column, ColumnStore, MockColumnStore, RowKey, TokenRecordStore};
pub use services::{TokenService, TokenServiceConfig};

//! Token service module for opaque bearer token management
//!
//! This module handles all token-related operations:
//! - issuance of signed opaque tokens backed by a persistent record
//! - validation, including signature and expiration checks
//! - refresh, rewriting the backing record to extend its lifetime

mod codec;
mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use codec::{DecodedToken, TokenCodec};
pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signer::{TokenSigner, SIGNATURE_LENGTH};

//! Shared configuration types for the tokend service
//!
//! This crate provides the configuration surface consumed by the core
//! token service: the signing salt, per-category token lifetimes, the
//! record persistence window, and the behavior flags.

pub mod config;

// Re-export commonly used items at crate root
pub use config::{TokenConfig, LONG_TOKEN_AGE_MS, SHORT_TOKEN_AGE_MS};

//! Configuration types built once at service startup

pub mod token;

pub use token::{TokenConfig, DEFAULT_TOKEN_SECRET_SALT, LONG_TOKEN_AGE_MS, SHORT_TOKEN_AGE_MS};

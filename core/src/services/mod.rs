//! Business services

pub mod token;

pub use token::{TokenService, TokenServiceConfig};

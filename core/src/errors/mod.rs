//! Error taxonomy for token parsing, validation and persistence

mod types;

pub use types::{StoreError, TokenError};

//! Token issuance and persistence configuration

use serde::{Deserialize, Serialize};

/// Short-lived tokens are good for 24 hours
pub const SHORT_TOKEN_AGE_MS: i64 = 24 * 60 * 60 * 1000;

/// Long-lived tokens are good for 7 days
pub const LONG_TOKEN_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Default signing salt, only suitable for development
pub const DEFAULT_TOKEN_SECRET_SALT: &str = "super secret token value";

/// Token service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Secret salt mixed into every token signature
    pub secret_salt: String,

    /// Lifetime of a token record in the column store, in milliseconds
    pub persistence_expires: i64,

    /// Maximum age of access tokens in milliseconds
    pub access_expires: i64,

    /// Maximum age of refresh tokens in milliseconds
    pub refresh_expires: i64,

    /// Maximum age of email tokens in milliseconds
    pub email_expires: i64,

    /// Maximum age of offline tokens in milliseconds
    pub offline_expires: i64,

    /// When true the expiry window is measured from the last validation
    /// instead of from creation
    #[serde(default)]
    pub expires_from_last_use: bool,

    /// When true a refresh rewrites the existing record in place
    #[serde(default = "default_refresh_reuses_id")]
    pub refresh_reuses_id: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret_salt: String::from(DEFAULT_TOKEN_SECRET_SALT),
            persistence_expires: LONG_TOKEN_AGE_MS,
            access_expires: SHORT_TOKEN_AGE_MS,
            refresh_expires: LONG_TOKEN_AGE_MS,
            email_expires: LONG_TOKEN_AGE_MS,
            offline_expires: LONG_TOKEN_AGE_MS,
            expires_from_last_use: false,
            refresh_reuses_id: default_refresh_reuses_id(),
        }
    }
}

impl TokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            secret_salt: std::env::var("AUTH_TOKEN_SECRET_SALT")
                .unwrap_or(defaults.secret_salt),
            persistence_expires: expiration_from_env(
                "AUTH_TOKEN_PERSISTENCE_EXPIRES",
                defaults.persistence_expires,
            ),
            access_expires: expiration_from_env("AUTH_TOKEN_ACCESS_EXPIRES", defaults.access_expires),
            refresh_expires: expiration_from_env(
                "AUTH_TOKEN_REFRESH_EXPIRES",
                defaults.refresh_expires,
            ),
            email_expires: expiration_from_env("AUTH_TOKEN_EMAIL_EXPIRES", defaults.email_expires),
            offline_expires: expiration_from_env(
                "AUTH_TOKEN_OFFLINE_EXPIRES",
                defaults.offline_expires,
            ),
            expires_from_last_use: flag_from_env("AUTH_TOKEN_EXPIRES_FROM_LAST_USE", false),
            refresh_reuses_id: flag_from_env("AUTH_TOKEN_REFRESH_REUSES_ID", true),
        }
    }

    /// Create a new configuration with the given signing salt
    pub fn new(secret_salt: impl Into<String>) -> Self {
        Self {
            secret_salt: secret_salt.into(),
            ..Default::default()
        }
    }

    /// Set the access token lifetime in milliseconds
    pub fn with_access_expires(mut self, millis: i64) -> Self {
        self.access_expires = positive_or(Some(millis), SHORT_TOKEN_AGE_MS);
        self
    }

    /// Set the record persistence window in milliseconds
    pub fn with_persistence_expires(mut self, millis: i64) -> Self {
        self.persistence_expires = positive_or(Some(millis), LONG_TOKEN_AGE_MS);
        self
    }

    /// Measure expiry windows from the last validation instead of creation
    pub fn with_expires_from_last_use(mut self, enabled: bool) -> Self {
        self.expires_from_last_use = enabled;
        self
    }

    /// Control whether a refresh keeps the existing identifier
    pub fn with_refresh_reuses_id(mut self, enabled: bool) -> Self {
        self.refresh_reuses_id = enabled;
        self
    }

    /// Check if using the default salt (security warning)
    pub fn is_using_default_salt(&self) -> bool {
        self.secret_salt == DEFAULT_TOKEN_SECRET_SALT
    }
}

fn default_refresh_reuses_id() -> bool {
    true
}

/// Non-positive expirations fall back to the default
fn positive_or(value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

fn expiration_from_env(name: &str, default: i64) -> i64 {
    positive_or(std::env::var(name).ok().and_then(|v| v.parse().ok()), default)
}

fn flag_from_env(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

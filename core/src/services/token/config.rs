//! Immutable configuration for the token service

use tokend_shared::config::TokenConfig;

use crate::domain::entities::TokenCategory;

/// Configuration the token service closes over, built once at construction
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret salt mixed into every signature
    pub secret_salt: String,
    /// Record lifetime in the column store, milliseconds
    pub max_persistence_age_ms: i64,
    /// Maximum token age per category, milliseconds
    pub access_expires_ms: i64,
    pub refresh_expires_ms: i64,
    pub email_expires_ms: i64,
    pub offline_expires_ms: i64,
    /// Measure the expiry window from the last validation instead of creation
    pub expires_from_last_use: bool,
    /// Keep the identifier when refreshing instead of allocating a new one
    pub refresh_reuses_id: bool,
}

impl TokenServiceConfig {
    /// Maximum age in milliseconds for tokens of `category`
    pub fn expiration_for(&self, category: TokenCategory) -> i64 {
        match category {
            TokenCategory::Access => self.access_expires_ms,
            TokenCategory::Refresh => self.refresh_expires_ms,
            TokenCategory::Email => self.email_expires_ms,
            TokenCategory::Offline => self.offline_expires_ms,
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        TokenConfig::default().into()
    }
}

impl From<TokenConfig> for TokenServiceConfig {
    fn from(config: TokenConfig) -> Self {
        Self {
            secret_salt: config.secret_salt,
            max_persistence_age_ms: config.persistence_expires,
            access_expires_ms: config.access_expires,
            refresh_expires_ms: config.refresh_expires,
            email_expires_ms: config.email_expires,
            offline_expires_ms: config.offline_expires,
            expires_from_last_use: config.expires_from_last_use,
            refresh_reuses_id: config.refresh_reuses_id,
        }
    }
}

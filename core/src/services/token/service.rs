//! Token issuance, validation and refresh

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::token::{AuthPrincipalInfo, TokenInfo};
use crate::domain::entities::TokenCategory;
use crate::domain::identifier;
use crate::errors::TokenError;
use crate::repositories::store::ColumnStore;
use crate::repositories::token::TokenRecordStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Issues, validates and refreshes opaque bearer tokens backed by a
/// wide-column record store.
///
/// The service holds no mutable state beyond the store handle; concurrent
/// callers coordinate only through the store, and the activity fields are
/// advisory metrics rather than locks.
pub struct TokenService<S: ColumnStore> {
    records: TokenRecordStore<S>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<S: ColumnStore> TokenService<S> {
    /// Creates a new token service over `store`
    pub fn new(store: S, config: TokenServiceConfig) -> Self {
        for category in TokenCategory::ALL {
            info!(
                category = category.name(),
                expires_after_secs = config.expiration_for(category) / 1_000,
                "token category configured"
            );
        }
        Self {
            records: TokenRecordStore::new(store, config.max_persistence_age_ms),
            codec: TokenCodec::new(config.secret_salt.clone()),
            config,
        }
    }

    /// Issues a token of `category`, writing its backing record.
    ///
    /// # Arguments
    ///
    /// * `category` - The token kind to issue
    /// * `token_type` - Free-form type tag; defaults to `"access"`
    /// * `principal` - Principal the token is bound to, if any
    /// * `state` - Opaque application-defined state
    ///
    /// # Returns
    ///
    /// The opaque token string the caller hands to the client.
    pub async fn issue(
        &self,
        category: TokenCategory,
        token_type: Option<&str>,
        principal: Option<AuthPrincipalInfo>,
        state: Option<HashMap<String, JsonValue>>,
    ) -> Result<String, TokenError> {
        let uuid = identifier::new_time_uuid();
        let created = identifier::timestamp_millis(&uuid)
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let token = TokenInfo::issued_at(uuid, created, token_type, principal, state);
        self.records.put(&token).await?;
        debug!(category = category.name(), %uuid, "issued token");

        Ok(self.encode(category, &uuid, created))
    }

    /// Issues an access token bound to `principal`
    pub async fn issue_access(&self, principal: AuthPrincipalInfo) -> Result<String, TokenError> {
        self.issue(TokenCategory::Access, None, Some(principal), None)
            .await
    }

    /// Issues an access token bound to `principal` carrying opaque state
    pub async fn issue_access_with_state(
        &self,
        principal: AuthPrincipalInfo,
        state: HashMap<String, JsonValue>,
    ) -> Result<String, TokenError> {
        self.issue(TokenCategory::Access, None, Some(principal), Some(state))
            .await
    }

    /// Issues a principal-less token of the given category and type
    pub async fn issue_typed(
        &self,
        category: TokenCategory,
        token_type: &str,
        state: Option<HashMap<String, JsonValue>>,
    ) -> Result<String, TokenError> {
        self.issue(category, Some(token_type), None, state).await
    }

    /// Validates an opaque token and returns its backing record.
    ///
    /// Verifies the signature, applies the expiry policy, loads the record,
    /// and touches the activity columns. The returned record reflects the
    /// new `accessed` value and any `inactive` update.
    ///
    /// # Errors
    ///
    /// * `BadToken` - Unparseable input or signature mismatch
    /// * `ExpiredToken` - The category's maximum age has passed
    /// * `InvalidToken` - No record underlies the token any more
    /// * `Store` - The column store failed
    pub async fn validate(&self, token: &str) -> Result<TokenInfo, TokenError> {
        let decoded = self.codec.decode(token)?;
        let now = Utc::now().timestamp_millis();
        let max_age = self.config.expiration_for(decoded.category);

        let created =
            identifier::timestamp_millis(&decoded.uuid).ok_or_else(|| TokenError::BadToken {
                reason: String::from("identifier carries no timestamp"),
            })?;
        if !self.config.expires_from_last_use && max_age > 0 {
            let expires_at = created.saturating_add(max_age);
            if now > expires_at {
                return Err(TokenError::ExpiredToken {
                    elapsed_ms: now - expires_at,
                });
            }
        }

        let mut info = self.records.get(&decoded.uuid).await?;

        if self.config.expires_from_last_use && max_age > 0 {
            let expires_at = info.accessed.saturating_add(max_age);
            if now > expires_at {
                return Err(TokenError::ExpiredToken {
                    elapsed_ms: now - expires_at,
                });
            }
        }

        let inactive = self
            .records
            .touch(&decoded.uuid, now, info.accessed, info.inactive)
            .await?;
        info.accessed = now;
        info.inactive = inactive;
        Ok(info)
    }

    /// Exchanges a valid token for a fresh access token.
    ///
    /// The backing record is fully rewritten, which resets every column's
    /// TTL. With `refresh_reuses_id` the identifier and `created` instant
    /// are preserved; otherwise a new identifier takes over and the old
    /// record is left to lapse.
    pub async fn refresh(&self, token: &str) -> Result<String, TokenError> {
        let mut info = self.validate(token).await?;

        if self.config.refresh_reuses_id {
            self.records.put(&info).await?;
            debug!(uuid = %info.uuid, "refreshed token in place");
            return Ok(self.encode(TokenCategory::Access, &info.uuid, info.created));
        }

        let uuid = identifier::new_time_uuid();
        let created = identifier::timestamp_millis(&uuid)
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let replacement = TokenInfo::issued_at(
            uuid,
            created,
            Some(&info.token_type),
            info.principal.take(),
            Some(std::mem::take(&mut info.state)),
        );
        self.records.put(&replacement).await?;
        debug!(superseded = %info.uuid, %uuid, "refreshed token onto a new record");

        Ok(self.encode(TokenCategory::Access, &uuid, created))
    }

    /// Lifetime of the token in milliseconds.
    ///
    /// Returns `expires - created` for categories that embed an expiration
    /// and `i64::MAX` for the rest.
    pub fn max_token_age(&self, token: &str) -> Result<i64, TokenError> {
        let decoded = self.codec.decode(token)?;
        if !decoded.category.carries_expiration() {
            return Ok(i64::MAX);
        }
        let created =
            identifier::timestamp_millis(&decoded.uuid).ok_or_else(|| TokenError::BadToken {
                reason: String::from("identifier carries no timestamp"),
            })?;
        Ok(decoded.expires - created)
    }

    fn encode(&self, category: TokenCategory, uuid: &Uuid, created: i64) -> String {
        let expires = created.saturating_add(self.config.expiration_for(category));
        self.codec.encode(category, uuid, expires)
    }
}

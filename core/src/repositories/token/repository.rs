//! Persistence adapter translating token records to and from the column store

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::domain::entities::token::{AuthPrincipalInfo, AuthPrincipalType, TokenInfo};
use crate::errors::{StoreError, TokenError};
use crate::repositories::store::{Column, ColumnStore};

use super::columns::{
    self, ALL_COLUMNS, COL_ACCESSED, COL_APPLICATION, COL_CREATED, COL_ENTITY, COL_INACTIVE,
    COL_PRINCIPAL_TYPE, COL_STATE, COL_TYPE, COL_UUID, REQUIRED_COLUMNS,
};

/// Persists `TokenInfo` records as TTL-bearing column batches
///
/// Every write stamps each column with the configured maximum persistence
/// age, so a record disappears from the store once that long passes without
/// a full rewrite.
pub struct TokenRecordStore<S: ColumnStore> {
    store: S,
    ttl_seconds: i64,
}

impl<S: ColumnStore> TokenRecordStore<S> {
    pub fn new(store: S, max_persistence_age_ms: i64) -> Self {
        Self {
            store,
            ttl_seconds: max_persistence_age_ms / 1_000,
        }
    }

    /// Writes the full record as one batch.
    ///
    /// A principal-less token omits the three principal columns.
    pub async fn put(&self, token: &TokenInfo) -> Result<(), TokenError> {
        let mut batch = vec![
            Column::new(COL_UUID, columns::encode_uuid(&token.uuid)),
            Column::new(COL_TYPE, columns::encode_utf8(&token.token_type)),
            Column::new(COL_CREATED, columns::encode_i64(token.created)),
            Column::new(COL_ACCESSED, columns::encode_i64(token.accessed)),
            Column::new(COL_INACTIVE, columns::encode_i64(token.inactive)),
        ];
        if let Some(principal) = &token.principal {
            batch.push(Column::new(
                COL_PRINCIPAL_TYPE,
                columns::encode_utf8(principal.principal_type.as_str()),
            ));
            batch.push(Column::new(COL_ENTITY, columns::encode_uuid(&principal.entity_id)));
            batch.push(Column::new(
                COL_APPLICATION,
                columns::encode_uuid(&principal.application_id),
            ));
        }
        batch.push(Column::new(COL_STATE, columns::encode_state(&token.state)?));

        self.store
            .set_columns(*token.uuid.as_bytes(), batch, self.ttl_seconds)
            .await?;
        Ok(())
    }

    /// Reads the record behind `uuid`.
    ///
    /// A missing required column means the token never existed or its TTL
    /// has lapsed; both surface as `InvalidToken`.
    pub async fn get(&self, uuid: &Uuid) -> Result<TokenInfo, TokenError> {
        let found = self
            .store
            .get_columns(*uuid.as_bytes(), &ALL_COLUMNS)
            .await?;
        if REQUIRED_COLUMNS.iter().any(|name| !found.contains_key(*name)) {
            return Err(TokenError::InvalidToken {
                reason: String::from("token not found in store"),
            });
        }

        let token_type = columns::decode_utf8(COL_TYPE, require(&found, COL_TYPE)?)?;
        let created = columns::decode_i64(COL_CREATED, require(&found, COL_CREATED)?)?;
        let accessed = columns::decode_i64(COL_ACCESSED, require(&found, COL_ACCESSED)?)?;
        let inactive = columns::decode_i64(COL_INACTIVE, require(&found, COL_INACTIVE)?)?;

        let principal = match found.get(COL_PRINCIPAL_TYPE) {
            Some(bytes) => {
                let name = columns::decode_utf8(COL_PRINCIPAL_TYPE, bytes)?;
                match AuthPrincipalType::parse(&name) {
                    Some(principal_type) => {
                        let entity_id =
                            columns::decode_uuid(COL_ENTITY, require_column(&found, COL_ENTITY)?)?;
                        let application_id = columns::decode_uuid(
                            COL_APPLICATION,
                            require_column(&found, COL_APPLICATION)?,
                        )?;
                        Some(AuthPrincipalInfo::new(principal_type, entity_id, application_id))
                    }
                    None => {
                        warn!(principal = %name, token = %uuid, "ignoring unrecognized principal type");
                        None
                    }
                }
            }
            None => None,
        };

        let state = match found.get(COL_STATE) {
            Some(bytes) => columns::decode_state(bytes)?,
            None => HashMap::new(),
        };

        Ok(TokenInfo {
            uuid: *uuid,
            token_type,
            created,
            accessed,
            inactive,
            principal,
            state,
        })
    }

    /// Refreshes the activity columns after a successful validation.
    ///
    /// `accessed` is always rewritten; `inactive` only when the gap since the
    /// previous validation sets a new maximum. Returns the inactive value now
    /// persisted.
    pub async fn touch(
        &self,
        uuid: &Uuid,
        now: i64,
        previous_accessed: i64,
        previous_inactive: i64,
    ) -> Result<i64, TokenError> {
        let mut batch = vec![Column::new(COL_ACCESSED, columns::encode_i64(now))];
        let mut inactive = previous_inactive;

        let gap = now - previous_accessed;
        if gap > previous_inactive {
            inactive = gap;
            batch.push(Column::new(COL_INACTIVE, columns::encode_i64(inactive)));
        }

        self.store
            .set_columns(*uuid.as_bytes(), batch, self.ttl_seconds)
            .await?;
        Ok(inactive)
    }
}

fn require<'a>(
    found: &'a HashMap<String, Vec<u8>>,
    column: &str,
) -> Result<&'a [u8], TokenError> {
    found
        .get(column)
        .map(Vec::as_slice)
        .ok_or_else(|| TokenError::InvalidToken {
            reason: String::from("token not found in store"),
        })
}

/// Principal columns travel with the principal type; a recognized type with
/// a missing companion column is store corruption, not a vanished token.
fn require_column<'a>(
    found: &'a HashMap<String, Vec<u8>>,
    column: &str,
) -> Result<&'a [u8], StoreError> {
    found
        .get(column)
        .map(Vec::as_slice)
        .ok_or_else(|| StoreError::Corrupt {
            column: column.to_string(),
        })
}

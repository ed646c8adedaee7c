//! Column store trait defining the persistence interface for token records.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::StoreError;

/// Row key addressing a record: the 16 big-endian bytes of its identifier
pub type RowKey = [u8; 16];

/// A named column value written in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub value: Vec<u8>,
}

impl Column {
    pub fn new(name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Interface expected from the wide-column store collaborator
///
/// The store holds rows of named columns where every column carries its own
/// expiration. A batch against a single row is expected to be atomic; there
/// is no cross-row coordination.
#[async_trait]
pub trait ColumnStore: Send + Sync {
    /// Writes `columns` under `key` as a single batch, every column carrying
    /// `ttl_seconds`.
    async fn set_columns(
        &self,
        key: RowKey,
        columns: Vec<Column>,
        ttl_seconds: i64,
    ) -> Result<(), StoreError>;

    /// Reads the named columns under `key`.
    ///
    /// Columns that were never written or whose TTL has lapsed are simply
    /// missing from the result.
    async fn get_columns(
        &self,
        key: RowKey,
        names: &[&str],
    ) -> Result<HashMap<String, Vec<u8>>, StoreError>;
}

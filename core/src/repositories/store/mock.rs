//! In-memory column store with per-column TTL, used by tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::StoreError;

use super::r#trait::{Column, ColumnStore, RowKey};

struct StoredColumn {
    value: Vec<u8>,
    expires_at: i64,
}

#[derive(Default)]
struct Inner {
    rows: RwLock<HashMap<RowKey, HashMap<String, StoredColumn>>>,
    clock_offset_ms: AtomicI64,
    fail_requests: AtomicBool,
}

/// Mock column store for testing
///
/// Clones share the same underlying rows, so a test can keep a handle while
/// the service owns another.
#[derive(Clone, Default)]
pub struct MockColumnStore {
    inner: Arc<Inner>,
}

impl MockColumnStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the store's clock forward so TTL lapse is observable without
    /// sleeping
    pub fn advance_millis(&self, millis: i64) {
        self.inner.clock_offset_ms.fetch_add(millis, Ordering::SeqCst);
    }

    /// Makes every subsequent request fail with a backend error
    pub fn fail_requests(&self, fail: bool) {
        self.inner.fail_requests.store(fail, Ordering::SeqCst);
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis() + self.inner.clock_offset_ms.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.fail_requests.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                message: String::from("mock store offline"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ColumnStore for MockColumnStore {
    async fn set_columns(
        &self,
        key: RowKey,
        columns: Vec<Column>,
        ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let expires_at = self.now_ms() + ttl_seconds * 1_000;

        let mut rows = self.inner.rows.write().await;
        let row = rows.entry(key).or_default();
        for column in columns {
            row.insert(
                column.name,
                StoredColumn {
                    value: column.value,
                    expires_at,
                },
            );
        }
        Ok(())
    }

    async fn get_columns(
        &self,
        key: RowKey,
        names: &[&str],
    ) -> Result<HashMap<String, Vec<u8>>, StoreError> {
        self.check_available()?;
        let now = self.now_ms();

        let rows = self.inner.rows.read().await;
        let mut found = HashMap::new();
        if let Some(row) = rows.get(&key) {
            for &name in names {
                if let Some(column) = row.get(name) {
                    if column.expires_at > now {
                        found.insert(name.to_string(), column.value.clone());
                    }
                }
            }
        }
        Ok(found)
    }
}

//! Column layout and value codecs for persisted token records
//!
//! One codec per persisted value shape: 16-byte identifiers, big-endian
//! signed 64-bit integers, UTF-8 strings, and JSON-encoded state.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::StoreError;

pub const COL_UUID: &str = "uuid";
pub const COL_TYPE: &str = "type";
pub const COL_CREATED: &str = "created";
pub const COL_ACCESSED: &str = "accessed";
pub const COL_INACTIVE: &str = "inactive";
pub const COL_PRINCIPAL_TYPE: &str = "principal";
pub const COL_ENTITY: &str = "entity";
pub const COL_APPLICATION: &str = "application";
pub const COL_STATE: &str = "state";

/// Every column a token record can carry
pub const ALL_COLUMNS: [&str; 9] = [
    COL_UUID,
    COL_TYPE,
    COL_CREATED,
    COL_ACCESSED,
    COL_INACTIVE,
    COL_PRINCIPAL_TYPE,
    COL_ENTITY,
    COL_APPLICATION,
    COL_STATE,
];

/// Columns that must be present for a record to be considered live
pub const REQUIRED_COLUMNS: [&str; 5] =
    [COL_UUID, COL_TYPE, COL_CREATED, COL_ACCESSED, COL_INACTIVE];

pub fn encode_i64(value: i64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn decode_i64(column: &str, bytes: &[u8]) -> Result<i64, StoreError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| StoreError::Corrupt {
        column: column.to_string(),
    })?;
    Ok(i64::from_be_bytes(raw))
}

pub fn encode_uuid(uuid: &Uuid) -> Vec<u8> {
    uuid.as_bytes().to_vec()
}

pub fn decode_uuid(column: &str, bytes: &[u8]) -> Result<Uuid, StoreError> {
    Uuid::from_slice(bytes).map_err(|_| StoreError::Corrupt {
        column: column.to_string(),
    })
}

pub fn encode_utf8(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

pub fn decode_utf8(column: &str, bytes: &[u8]) -> Result<String, StoreError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| StoreError::Corrupt {
        column: column.to_string(),
    })
}

pub fn encode_state(state: &HashMap<String, JsonValue>) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(state).map_err(|_| StoreError::Corrupt {
        column: COL_STATE.to_string(),
    })
}

/// Absent or empty state bytes decode to an empty map
pub fn decode_state(bytes: &[u8]) -> Result<HashMap<String, JsonValue>, StoreError> {
    if bytes.is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_slice(bytes).map_err(|_| StoreError::Corrupt {
        column: COL_STATE.to_string(),
    })
}

//! Time-ordered identifier allocation and inspection
//!
//! Tokens are keyed by version-1 identifiers so the creation instant can be
//! recovered from the identifier itself.

use std::sync::OnceLock;

use chrono::Utc;
use rand::RngCore;
use uuid::{Context, Timestamp, Uuid};

fn node_id() -> &'static [u8; 6] {
    static NODE_ID: OnceLock<[u8; 6]> = OnceLock::new();
    NODE_ID.get_or_init(|| {
        let mut id = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut id);
        // multicast bit marks the node id as randomly generated (RFC 4122 §4.5)
        id[0] |= 0x01;
        id
    })
}

fn clock_context() -> &'static Context {
    static CONTEXT: OnceLock<Context> = OnceLock::new();
    CONTEXT.get_or_init(|| Context::new(rand::random()))
}

/// Allocates a version-1 identifier for the current wall clock.
pub fn new_time_uuid() -> Uuid {
    time_uuid_at(Utc::now().timestamp_millis())
}

/// Builds a version-1 identifier whose time field encodes `millis`.
pub fn time_uuid_at(millis: i64) -> Uuid {
    let seconds = millis.div_euclid(1000) as u64;
    let subsec_nanos = (millis.rem_euclid(1000) * 1_000_000) as u32;
    let timestamp = Timestamp::from_unix(clock_context(), seconds, subsec_nanos);
    Uuid::new_v1(timestamp, node_id())
}

/// Milliseconds since the Unix epoch encoded in a time-based identifier.
///
/// Returns `None` for identifiers that carry no timestamp (non-v1 versions).
pub fn timestamp_millis(uuid: &Uuid) -> Option<i64> {
    let (seconds, nanos) = uuid.get_timestamp()?.to_unix();
    Some(seconds as i64 * 1_000 + i64::from(nanos) / 1_000_000)
}

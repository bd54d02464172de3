//! Check-in record ID generation.
//!
//! Record IDs are random UUID v4 strings. When the OS randomness source is
//! unavailable the ID falls back to `{unix_millis}-{counter}`, which is unique
//! within a process and sortable across processes.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use uuid::{Builder, Uuid};

static FALLBACK_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a new check-in record ID.
#[must_use]
pub fn new_record_id() -> String {
    // `Uuid::new_v4` panics without an entropy source; read it fallibly.
    let mut bytes = [0u8; 16];
    match getrandom::fill(&mut bytes) {
        Ok(()) => uuid_from_random(bytes).to_string(),
        Err(_) => fallback_id(Utc::now().timestamp_millis()),
    }
}

fn uuid_from_random(bytes: [u8; 16]) -> Uuid {
    Builder::from_random_bytes(bytes).into_uuid()
}

fn fallback_id(now_millis: i64) -> String {
    let seq = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{now_millis}-{seq:04}")
}

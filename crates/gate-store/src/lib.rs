//! # gate-store
//!
//! Persistence for check-in records.
//!
//! The [`LogStore`] trait is the only thing the guard workflow sees. Two
//! families implement it: a local JSON Lines file ([`JsonlLogStore`]) and a
//! libSQL table ([`LibSqlLogStore`]), which runs against a local file or a
//! remote Turso database. [`FallbackLogStore`] pairs a remote primary with a
//! local fallback, and [`LogBackend`] picks one arrangement from configuration
//! once at startup.
//!
//! Log review (search, filters, day grouping) lives in [`query`], CSV export
//! in [`export`].

pub mod backend;
pub mod error;
pub mod export;
pub mod fallback;
pub mod helpers;
pub mod jsonl;
mod migrations;
pub mod query;
pub mod retry;
pub mod sql;

use std::future::Future;

use gate_core::record::CheckInRecord;
use serde::Serialize;

pub use backend::LogBackend;
pub use error::StoreError;
pub use fallback::FallbackLogStore;
pub use jsonl::JsonlLogStore;
pub use sql::LibSqlLogStore;

/// Where an appended record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// The configured store accepted the write.
    Primary,
    /// The primary failed; the record was kept in the local fallback.
    Fallback,
}

/// Acknowledgement of a durable append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendReceipt {
    pub location: StoreLocation,
    /// Primary failure message when `location` is `Fallback`.
    pub degraded_reason: Option<String>,
}

impl AppendReceipt {
    #[must_use]
    pub const fn primary() -> Self {
        Self {
            location: StoreLocation::Primary,
            degraded_reason: None,
        }
    }

    #[must_use]
    pub const fn fallback(reason: String) -> Self {
        Self {
            location: StoreLocation::Fallback,
            degraded_reason: Some(reason),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.location == StoreLocation::Fallback
    }
}

/// Append-only check-in log.
///
/// The store is shared with other guard stations, so `list_all` may return
/// records this process never wrote.
pub trait LogStore: Send + Sync {
    /// Durably append one record.
    fn append(
        &self,
        record: &CheckInRecord,
    ) -> impl Future<Output = Result<AppendReceipt, StoreError>> + Send;

    /// Every record, newest check-in first.
    fn list_all(&self) -> impl Future<Output = Result<Vec<CheckInRecord>, StoreError>> + Send;

    /// Remove every record.
    fn clear_all(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Short human-readable description, e.g. `local file .gate/visitor_logs.jsonl`.
    fn describe(&self) -> String;
}

/// Sort records newest check-in first. Ties keep their relative order.
pub(crate) fn sort_newest_first(records: &mut [CheckInRecord]) {
    records.sort_by(|a, b| b.check_in_time_iso.cmp(&a.check_in_time_iso));
}

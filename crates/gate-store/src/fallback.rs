//! Remote-primary store with a local fallback.
//!
//! Reads and writes go to the primary first. When the primary fails, the
//! local store is used instead and the caller is told so through the
//! [`AppendReceipt`]. Records written to the fallback are not replayed to the
//! primary later; the two logs can diverge while the primary is down.

use gate_core::record::CheckInRecord;

use crate::error::StoreError;
use crate::{AppendReceipt, LogStore};

pub struct FallbackLogStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P: LogStore, F: LogStore> FallbackLogStore<P, F> {
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub const fn primary(&self) -> &P {
        &self.primary
    }

    pub const fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: LogStore, F: LogStore> LogStore for FallbackLogStore<P, F> {
    async fn append(&self, record: &CheckInRecord) -> Result<AppendReceipt, StoreError> {
        match self.primary.append(record).await {
            Ok(receipt) => Ok(receipt),
            Err(primary) => {
                tracing::warn!(
                    id = %record.id,
                    primary = %self.primary.describe(),
                    "primary log store append failed, writing locally: {primary}"
                );
                match self.fallback.append(record).await {
                    Ok(_) => Ok(AppendReceipt::fallback(primary.to_string())),
                    Err(fallback) => Err(StoreError::Fallback {
                        primary: Box::new(primary),
                        fallback: Box::new(fallback),
                    }),
                }
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<CheckInRecord>, StoreError> {
        match self.primary.list_all().await {
            Ok(records) => Ok(records),
            Err(primary) => {
                tracing::warn!(
                    primary = %self.primary.describe(),
                    "primary log store read failed, showing local log: {primary}"
                );
                self.fallback
                    .list_all()
                    .await
                    .map_err(|fallback| StoreError::Fallback {
                        primary: Box::new(primary),
                        fallback: Box::new(fallback),
                    })
            }
        }
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let primary = self.primary.clear_all().await;
        let fallback = self.fallback.clear_all().await;
        primary?;
        fallback
    }

    fn describe(&self) -> String {
        format!(
            "{} (fallback: {})",
            self.primary.describe(),
            self.fallback.describe()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Utc};
    use gate_core::enums::Outcome;
    use tempfile::TempDir;

    use super::*;
    use crate::StoreLocation;
    use crate::jsonl::JsonlLogStore;

    /// Store whose every call fails, counting attempts.
    #[derive(Default)]
    struct DownStore {
        calls: AtomicUsize,
    }

    impl LogStore for DownStore {
        async fn append(&self, _record: &CheckInRecord) -> Result<AppendReceipt, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Query("remote unreachable".into()))
        }

        async fn list_all(&self) -> Result<Vec<CheckInRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Query("remote unreachable".into()))
        }

        async fn clear_all(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Query("remote unreachable".into()))
        }

        fn describe(&self) -> String {
            "down".into()
        }
    }

    fn record(id: &str) -> CheckInRecord {
        CheckInRecord {
            id: id.to_string(),
            visitor_full_name: "Ali".to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: "N/A".to_string(),
            destination_label: "Blk A - 10 - 05".to_string(),
            check_in_time_iso: DateTime::<Utc>::from_timestamp(1_760_000_000, 0).unwrap(),
            outcome: Outcome::Granted,
            note: String::new(),
        }
    }

    fn local(dir: &TempDir, name: &str) -> JsonlLogStore {
        JsonlLogStore::new(dir.path().join(name))
    }

    #[tokio::test]
    async fn healthy_primary_is_used() {
        let dir = TempDir::new().unwrap();
        let store = FallbackLogStore::new(local(&dir, "primary.jsonl"), local(&dir, "fallback.jsonl"));

        let receipt = store.append(&record("a")).await.unwrap();
        assert_eq!(receipt.location, StoreLocation::Primary);
        assert_eq!(store.primary().list_all().await.unwrap().len(), 1);
        assert!(store.fallback().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_falls_back_and_reports_it() {
        let dir = TempDir::new().unwrap();
        let store = FallbackLogStore::new(DownStore::default(), local(&dir, "fallback.jsonl"));

        let receipt = store.append(&record("a")).await.unwrap();
        assert!(receipt.is_degraded());
        assert!(
            receipt
                .degraded_reason
                .as_deref()
                .unwrap()
                .contains("remote unreachable")
        );
        assert_eq!(store.fallback().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_falls_back_to_local() {
        let dir = TempDir::new().unwrap();
        let store = FallbackLogStore::new(DownStore::default(), local(&dir, "fallback.jsonl"));
        store.fallback().append(&record("local-only")).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed[0].id, "local-only");
    }

    #[tokio::test]
    async fn both_failing_is_an_error() {
        let store = FallbackLogStore::new(DownStore::default(), DownStore::default());
        let err = store.append(&record("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Fallback { .. }));
        assert_eq!(store.primary().calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.fallback().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_clears_fallback_even_when_primary_fails() {
        let dir = TempDir::new().unwrap();
        let store = FallbackLogStore::new(DownStore::default(), local(&dir, "fallback.jsonl"));
        store.fallback().append(&record("a")).await.unwrap();

        assert!(store.clear_all().await.is_err());
        assert!(store.fallback().list_all().await.unwrap().is_empty());
    }
}

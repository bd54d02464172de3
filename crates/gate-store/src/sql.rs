//! libSQL-backed log store.
//!
//! Records live in the `security_logs` table. The same type serves a local
//! database file (or `:memory:` in tests) and a remote Turso database; only
//! remote statements go through the transient-error retry loop.

use chrono::SecondsFormat;
use gate_core::record::CheckInRecord;
use libsql::Builder;

use crate::error::StoreError;
use crate::helpers::{get_string_or_empty, parse_datetime, parse_enum};
use crate::retry::{RetryConfig, with_retry};
use crate::{AppendReceipt, LogStore, migrations, sort_newest_first};

const INSERT_SQL: &str = "INSERT INTO security_logs \
     (id, visitor_name, ic_number, car_plate, destination, check_in_time, status, note) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

// Latest insert first; the time order is applied after parsing, since rows from
// other writers store `check_in_time` in a different text format.
const SELECT_ALL_SQL: &str = "SELECT id, visitor_name, ic_number, car_plate, destination, \
     check_in_time, status, note FROM security_logs ORDER BY rowid DESC";

const DELETE_ALL_SQL: &str = "DELETE FROM security_logs";

fn row_to_record(row: &libsql::Row) -> Result<CheckInRecord, StoreError> {
    Ok(CheckInRecord {
        id: row.get::<String>(0)?,
        visitor_full_name: row.get::<String>(1)?,
        id_number: row.get::<String>(2)?,
        vehicle_plate: get_string_or_empty(row, 3)?,
        destination_label: row.get::<String>(4)?,
        check_in_time_iso: parse_datetime(&row.get::<String>(5)?)?,
        outcome: parse_enum(&row.get::<String>(6)?)?,
        note: get_string_or_empty(row, 7)?,
    })
}

pub struct LibSqlLogStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    origin: String,
    retry: Option<RetryConfig>,
}

impl LibSqlLogStore {
    /// Open a local database file (or `:memory:`). Runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        migrations::run(&conn).await?;
        Ok(Self {
            db,
            conn,
            origin: format!("libSQL file {path}"),
            retry: None,
        })
    }

    /// Connect to a remote Turso database.
    ///
    /// No network round trip happens here beyond the schema check; if that
    /// check fails the store is still returned and later calls surface the
    /// error, so a [`crate::FallbackLogStore`] can take over.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the client cannot be built.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, StoreError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        if let Err(e) = migrations::run(&conn).await {
            tracing::warn!(url, "could not verify remote log schema: {e}");
        }
        Ok(Self {
            db,
            conn,
            origin: format!("Turso {url}"),
            retry: Some(RetryConfig::default()),
        })
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.retry.is_some()
    }

    async fn execute(&self, sql: &str, params: Vec<libsql::Value>) -> Result<u64, StoreError> {
        let result = match &self.retry {
            Some(config) => {
                with_retry(config, || self.conn.execute(sql, params.clone())).await
            }
            None => self.conn.execute(sql, params).await,
        };
        Ok(result?)
    }
}

impl LogStore for LibSqlLogStore {
    async fn append(&self, record: &CheckInRecord) -> Result<AppendReceipt, StoreError> {
        let params: Vec<libsql::Value> = vec![
            record.id.as_str().into(),
            record.visitor_full_name.as_str().into(),
            record.id_number.as_str().into(),
            record.vehicle_plate.as_str().into(),
            record.destination_label.as_str().into(),
            record
                .check_in_time_iso
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
            record.outcome.as_str().into(),
            record.note.as_str().into(),
        ];
        self.execute(INSERT_SQL, params).await?;
        tracing::debug!(id = %record.id, origin = %self.origin, "appended check-in");
        Ok(AppendReceipt::primary())
    }

    async fn list_all(&self) -> Result<Vec<CheckInRecord>, StoreError> {
        let mut rows = match &self.retry {
            Some(config) => with_retry(config, || self.conn.query(SELECT_ALL_SQL, ())).await?,
            None => self.conn.query(SELECT_ALL_SQL, ()).await?,
        };

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let removed = self.execute(DELETE_ALL_SQL, Vec::new()).await?;
        tracing::debug!(removed, origin = %self.origin, "cleared check-in log");
        Ok(())
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use gate_core::enums::Outcome;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn test_store() -> LibSqlLogStore {
        LibSqlLogStore::open_local(":memory:").await.unwrap()
    }

    fn record(id: &str, millis: i64, outcome: Outcome) -> CheckInRecord {
        CheckInRecord {
            id: id.to_string(),
            visitor_full_name: "Ali bin Abu".to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: "WXY 1234".to_string(),
            destination_label: "Blk A - 10 - 05".to_string(),
            check_in_time_iso: DateTime::<Utc>::from_timestamp_millis(millis).unwrap(),
            outcome,
            note: "Standard entry.".to_string(),
        }
    }

    #[tokio::test]
    async fn open_local_creates_table() {
        let store = test_store().await;
        let mut rows = store
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                ["security_logs"],
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
        assert!(!store.is_remote());
    }

    #[tokio::test]
    async fn append_then_list_round_trips_fields() {
        let store = test_store().await;
        let original = record("r1", 1_760_000_000_123, Outcome::Expired);
        store.append(&original).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed, vec![original]);
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = test_store().await;
        store.append(&record("a", 1_000, Outcome::Granted)).await.unwrap();
        store.append(&record("c", 3_000, Outcome::Denied)).await.unwrap();
        store.append(&record("b", 2_000, Outcome::Granted)).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = test_store().await;
        store.append(&record("dup", 1_000, Outcome::Granted)).await.unwrap();
        let second = store.append(&record("dup", 2_000, Outcome::Granted)).await;
        assert!(matches!(second, Err(StoreError::LibSql(_))));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rows_from_other_writers_are_readable() {
        let store = test_store().await;
        store
            .conn()
            .execute(
                "INSERT INTO security_logs (id, visitor_name, ic_number, destination, check_in_time, status)
                 VALUES ('ext', 'Mei Ling', '880808085555', 'Blk C - 1 - 1', '2026-02-09 14:30:00', 'DENIED')",
                (),
            )
            .await
            .unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed[0].vehicle_plate, "N/A");
        assert_eq!(listed[0].note, "");
        assert_eq!(listed[0].outcome, Outcome::Denied);
        assert_eq!(listed[0].check_in_time_iso.timestamp(), 1_770_647_400);
    }

    #[tokio::test]
    async fn mixed_time_formats_sort_by_instant() {
        let store = test_store().await;
        store
            .conn()
            .execute(
                "INSERT INTO security_logs (id, visitor_name, ic_number, destination, check_in_time, status)
                 VALUES ('afternoon', 'Mei Ling', '880808085555', 'Blk C - 1 - 1', '2026-02-09 14:30:00', 'GRANTED')",
                (),
            )
            .await
            .unwrap();
        // 09:00 the same day, stored as RFC 3339.
        store
            .append(&record("morning", 1_770_627_600_000, Outcome::Granted))
            .await
            .unwrap();
        store
            .append(&record("same-instant", 1_770_647_400_000, Outcome::Granted))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["same-instant", "afternoon", "morning"]);
    }

    #[tokio::test]
    async fn clear_all_empties_table() {
        let store = test_store().await;
        store.append(&record("a", 1_000, Outcome::Granted)).await.unwrap();
        store.append(&record("b", 2_000, Outcome::Granted)).await.unwrap();

        store.clear_all().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reopening_file_keeps_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs.db");
        let path = path.to_str().unwrap();

        {
            let store = LibSqlLogStore::open_local(path).await.unwrap();
            store.append(&record("kept", 1_000, Outcome::Granted)).await.unwrap();
        }

        let store = LibSqlLogStore::open_local(path).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}

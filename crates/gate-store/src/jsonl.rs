//! Local-only log store backed by a JSON Lines file.
//!
//! One record per line, appended with `serde_jsonlines::append_json_lines`.
//! A missing file reads as an empty log. Clearing removes the file.
//!
//! File work runs on the blocking pool, one operation at a time per store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gate_core::record::CheckInRecord;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::{AppendReceipt, LogStore, sort_newest_first};

pub struct JsonlLogStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl JsonlLogStore {
    /// Point the store at `path`. Nothing is created until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against the log path on the blocking pool, holding the store lock.
    async fn with_file<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let _guard = self.io.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || op(&path))
            .await
            .map_err(|e| StoreError::Task(format!("spawn_blocking join: {e}")))?
    }
}

fn append_record(path: &Path, record: &CheckInRecord) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    serde_jsonlines::append_json_lines(path, [record])?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<CheckInRecord>, StoreError> {
    let lines = match serde_jsonlines::json_lines::<CheckInRecord, _>(path) {
        Ok(lines) => lines,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        match line {
            Ok(record) => records.push(record),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(
                    path = %path.display(),
                    line = idx + 1,
                    "skipping unreadable log line: {e}"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(records)
}

fn remove_log(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl LogStore for JsonlLogStore {
    async fn append(&self, record: &CheckInRecord) -> Result<AppendReceipt, StoreError> {
        let owned = record.clone();
        self.with_file(move |path| append_record(path, &owned)).await?;
        tracing::debug!(id = %record.id, path = %self.path.display(), "appended check-in");
        Ok(AppendReceipt::primary())
    }

    async fn list_all(&self) -> Result<Vec<CheckInRecord>, StoreError> {
        let mut records = self.with_file(read_records).await?;
        // Later lines win ties on identical timestamps.
        records.reverse();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.with_file(remove_log).await
    }

    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use gate_core::enums::Outcome;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn record(id: &str, secs: i64) -> CheckInRecord {
        CheckInRecord {
            id: id.to_string(),
            visitor_full_name: "Ali".to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: "N/A".to_string(),
            destination_label: "Blk A - 10 - 05".to_string(),
            check_in_time_iso: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
            outcome: Outcome::Granted,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonlLogStore::new(dir.path().join("none.jsonl"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = JsonlLogStore::new(dir.path().join("nested/deeper/log.jsonl"));
        store.append(&record("a", 100)).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = JsonlLogStore::new(dir.path().join("log.jsonl"));
        store.append(&record("old", 100)).await.unwrap();
        store.append(&record("new", 300)).await.unwrap();
        store.append(&record("mid", 200)).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn same_timestamp_keeps_latest_append_first() {
        let dir = TempDir::new().unwrap();
        let store = JsonlLogStore::new(dir.path().join("log.jsonl"));
        store.append(&record("first", 100)).await.unwrap();
        store.append(&record("second", 100)).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed[0].id, "second");
    }

    #[tokio::test]
    async fn corrupt_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = JsonlLogStore::new(&path);
        store.append(&record("good", 100)).await.unwrap();
        std::fs::write(
            &path,
            format!("{}not json\n", std::fs::read_to_string(&path).unwrap()),
        )
        .unwrap();
        store.append(&record("after", 200)).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["after", "good"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_all_land_as_whole_lines() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(JsonlLogStore::new(dir.path().join("log.jsonl")));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.append(&record(&format!("r{i}"), i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 32);
        assert_eq!(listed[0].id, "r31");
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 32);
    }

    #[tokio::test]
    async fn clear_removes_everything_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = JsonlLogStore::new(dir.path().join("log.jsonl"));
        store.append(&record("a", 100)).await.unwrap();

        store.clear_all().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        store.clear_all().await.unwrap();
    }
}

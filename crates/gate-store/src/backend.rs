//! Startup-time selection of the log store arrangement.

use std::path::Path;

use gate_config::GateConfig;
use gate_core::record::CheckInRecord;

use crate::error::StoreError;
use crate::fallback::FallbackLogStore;
use crate::jsonl::JsonlLogStore;
use crate::sql::LibSqlLogStore;
use crate::{AppendReceipt, LogStore};

/// The log store chosen from configuration. Resolved once; every call
/// afterwards goes to the same arrangement.
pub enum LogBackend {
    /// JSON Lines file under `store.data_dir`.
    Local(JsonlLogStore),
    /// Local libSQL database file (`turso.database_file`).
    LocalSql(LibSqlLogStore),
    /// Remote Turso database with the JSON Lines file as fallback.
    Remote(FallbackLogStore<LibSqlLogStore, JsonlLogStore>),
}

impl LogBackend {
    /// Pick the backend for `config`. Relative paths resolve against `root`.
    ///
    /// 1. `turso.url` + `turso.auth_token` set: remote, local file as fallback
    /// 2. `turso.database_file` set: local libSQL file
    /// 3. otherwise: local JSON Lines file
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a libSQL database cannot be opened.
    pub async fn resolve(config: &GateConfig, root: &Path) -> Result<Self, StoreError> {
        let local = JsonlLogStore::new(root.join(config.store.log_path()));

        if config.turso.is_configured() {
            let remote = LibSqlLogStore::open_remote(&config.turso.url, &config.turso.auth_token).await?;
            tracing::debug!(url = %config.turso.url, "using remote log store with local fallback");
            return Ok(Self::Remote(FallbackLogStore::new(remote, local)));
        }

        if config.turso.has_local_database() {
            let path = root.join(&config.turso.database_file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = LibSqlLogStore::open_local(&path.to_string_lossy()).await?;
            tracing::debug!(path = %path.display(), "using local libSQL log store");
            return Ok(Self::LocalSql(store));
        }

        tracing::debug!(path = %local.path().display(), "using local log file");
        Ok(Self::Local(local))
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::LocalSql(_) => "local-sql",
            Self::Remote(_) => "remote",
        }
    }
}

impl LogStore for LogBackend {
    async fn append(&self, record: &CheckInRecord) -> Result<AppendReceipt, StoreError> {
        match self {
            Self::Local(store) => store.append(record).await,
            Self::LocalSql(store) => store.append(record).await,
            Self::Remote(store) => store.append(record).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<CheckInRecord>, StoreError> {
        match self {
            Self::Local(store) => store.list_all().await,
            Self::LocalSql(store) => store.list_all().await,
            Self::Remote(store) => store.list_all().await,
        }
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.clear_all().await,
            Self::LocalSql(store) => store.clear_all().await,
            Self::Remote(store) => store.clear_all().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Local(store) => store.describe(),
            Self::LocalSql(store) => store.describe(),
            Self::Remote(store) => store.describe(),
        }
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use gate_config::GateConfig;
use gate_guard::Notes;
use gate_store::{LogBackend, LogStore};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub store: Arc<LogBackend>,
    pub notes: Arc<Notes>,
    pub config: GateConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Resolve the log backend and note enricher for `project_root`.
    pub async fn init(project_root: PathBuf, config: GateConfig) -> anyhow::Result<Self> {
        let store = LogBackend::resolve(&config, &project_root)
            .await
            .context("failed to open the check-in log")?;
        tracing::debug!(backend = store.kind(), store = %store.describe(), "log store ready");

        let notes = Notes::from_config(&config.notes);
        tracing::debug!(provider = ?notes.provider(), "note enricher ready");

        Ok(Self {
            store: Arc::new(store),
            notes: Arc::new(notes),
            config,
            project_root,
        })
    }
}

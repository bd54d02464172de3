//! Storage error types for gate-store.

use thiserror::Error;

/// Errors from log store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed or returned unexpected data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// The local log file could not be read or written.
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking file task panicked or was cancelled.
    #[error("Log file task failed: {0}")]
    Task(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Both the primary store and its local fallback failed.
    #[error("Primary store failed ({primary}) and local fallback failed ({fallback})")]
    Fallback {
        primary: Box<StoreError>,
        fallback: Box<StoreError>,
    },
}

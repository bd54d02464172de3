//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time. All statements use
//! `IF NOT EXISTS` so re-running on every open is harmless.

use crate::error::StoreError;

const MIGRATION_001: &str = include_str!("../migrations/001_security_logs.sql");

/// Run all embedded migrations in sequence.
pub(crate) async fn run(conn: &libsql::Connection) -> Result<(), StoreError> {
    conn.execute_batch(MIGRATION_001)
        .await
        .map_err(|e| StoreError::Migration(format!("001_security_logs: {e}")))?;
    Ok(())
}

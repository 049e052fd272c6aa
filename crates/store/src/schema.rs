//! Table creation

use sqlx::SqlitePool;
use vigil_errors::{Error, StoreError};

/// Create all tables if they do not exist
pub(crate) async fn create_tables(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS agents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hostname TEXT UNIQUE NOT NULL,
            token TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::DatabaseError {
        message: format!("Failed to create agents table: {e}"),
    })?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hostname TEXT NOT NULL,
            payload TEXT NOT NULL,
            analysis TEXT,
            created_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::DatabaseError {
        message: format!("Failed to create reports table: {e}"),
    })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_hostname ON reports(hostname)")
        .execute(pool)
        .await
        .map_err(|e| StoreError::DatabaseError {
            message: format!("Failed to create reports index: {e}"),
        })?;

    Ok(())
}

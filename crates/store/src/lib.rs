#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Collector-side storage
//!
//! This crate manages the `SQLite` database that tracks registered agents
//! and stored reports. Every operation is a single statement, so
//! concurrent agent submissions and the analysis poller stay atomic per
//! record without cross-record locking.

mod schema;
mod store;

pub use store::Store;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use vigil_errors::{Error, StoreError};

/// Create a new `SQLite` connection pool
///
/// # Errors
///
/// Returns an error if the database connection fails.
pub async fn create_pool(db_path: &Path) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            Error::from(StoreError::ConnectionFailed {
                message: e.to_string(),
            })
        })?;

    Ok(pool)
}

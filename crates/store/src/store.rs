//! Agent and report storage operations

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use vigil_errors::{Error, StoreError};
use vigil_types::{ReportDetail, ReportSummary};

/// Listing page size
const LIST_LIMIT: i64 = 100;

/// Handle to the collector database
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or the schema cannot
    /// be applied.
    pub async fn open(path: &Path) -> Result<Self, Error> {
        let pool = crate::create_pool(path).await?;
        crate::schema::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool, applying the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, Error> {
        crate::schema::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Register a hostname, minting a fresh token
    ///
    /// Idempotent per hostname: re-registration rotates the token in a
    /// single atomic upsert, implicitly invalidating the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn register_agent(&self, hostname: &str) -> Result<String, Error> {
        let token = uuid::Uuid::new_v4().simple().to_string();

        sqlx::query(
            "INSERT INTO agents (hostname, token, created_at) VALUES (?, ?, ?)
             ON CONFLICT(hostname) DO UPDATE SET token = excluded.token",
        )
        .bind(hostname)
        .bind(&token)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::info!(hostname, "agent registered");
        Ok(token)
    }

    /// Resolve a bearer token to the hostname it is bound to
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn hostname_for_token(&self, token: &str) -> Result<Option<String>, Error> {
        let row = sqlx::query("SELECT hostname FROM agents WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("hostname")))
    }

    /// Store a submitted payload verbatim, assigning the next id
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or the write
    /// fails.
    pub async fn insert_report(
        &self,
        hostname: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            "INSERT INTO reports (hostname, payload, analysis, created_at)
             VALUES (?, ?, NULL, ?)",
        )
        .bind(hostname)
        .bind(serde_json::to_string(payload)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(hostname, report_id = id, "report stored");
        Ok(id)
    }

    /// Attach analysis text to a stored report
    ///
    /// Repeated calls overwrite; keeping analysis single-write is the
    /// poller's job, not the store's.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReportNotFound`] for an unknown id.
    pub async fn attach_analysis(&self, id: i64, text: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE reports SET analysis = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ReportNotFound { id }.into());
        }

        tracing::info!(report_id = id, "analysis attached");
        Ok(())
    }

    /// List stored reports newest first, optionally filtered by hostname
    ///
    /// Bounded to a fixed page size.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_reports(
        &self,
        hostname: Option<&str>,
    ) -> Result<Vec<ReportSummary>, Error> {
        // Ids are assigned monotonically, so id order is creation order
        let rows = match hostname {
            Some(hostname) => {
                sqlx::query(
                    "SELECT id, hostname, analysis, created_at FROM reports
                     WHERE hostname = ? ORDER BY id DESC LIMIT ?",
                )
                .bind(hostname)
                .bind(LIST_LIMIT)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, hostname, analysis, created_at FROM reports
                     ORDER BY id DESC LIMIT ?",
                )
                .bind(LIST_LIMIT)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter()
            .map(|row| {
                Ok(ReportSummary {
                    id: row.get("id"),
                    hostname: row.get("hostname"),
                    created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
                    has_analysis: row
                        .get::<Option<String>, _>("analysis")
                        .is_some_and(|a| !a.trim().is_empty()),
                })
            })
            .collect()
    }

    /// Fetch a stored report with its payload and analysis
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored payload
    /// is not valid JSON.
    pub async fn get_report(&self, id: i64) -> Result<Option<ReportDetail>, Error> {
        let row = sqlx::query(
            "SELECT id, hostname, payload, analysis, created_at FROM reports WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| detail_from_row(&row)).transpose()
    }

    /// Reports still waiting for analysis (null or empty field)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn reports_missing_analysis(&self) -> Result<Vec<ReportDetail>, Error> {
        let rows = sqlx::query(
            "SELECT id, hostname, payload, analysis, created_at FROM reports
             WHERE analysis IS NULL OR TRIM(analysis) = '' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(detail_from_row).collect()
    }
}

fn detail_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReportDetail, Error> {
    Ok(ReportDetail {
        id: row.get("id"),
        hostname: row.get("hostname"),
        payload: serde_json::from_str(&row.get::<String, _>("payload"))?,
        analysis: row.get("analysis"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StoreError::DatabaseError {
                message: format!("invalid stored timestamp {raw:?}: {e}"),
            }
            .into()
        })
}

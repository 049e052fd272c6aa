//! Store error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("database connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("report not found: {id}")]
    ReportNotFound { id: i64 },
}

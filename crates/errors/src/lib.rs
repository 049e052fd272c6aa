#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for vigil
//!
//! This crate provides fine-grained error types organized by domain,
//! aggregated into a single [`Error`] for cross-crate boundaries.

use thiserror::Error;

pub mod advisory;
pub mod analysis;
pub mod config;
pub mod remediate;
pub mod report;
pub mod server;
pub mod store;

// Re-export all error types at the root
pub use advisory::AdvisoryError;
pub use analysis::AnalysisError;
pub use config::ConfigError;
pub use remediate::RemediateError;
pub use report::ReportError;
pub use server::ServerError;
pub use store::StoreError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Error)]
pub enum Error {
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("remediation error: {0}")]
    Remediate(#[from] RemediateError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("server error: {0}")]
    Server(#[from] ServerError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::DatabaseError {
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for vigil operations
pub type Result<T> = std::result::Result<T, Error>;

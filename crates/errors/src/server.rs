//! Ingestion service error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ServerError {
    #[error("failed to bind {addr}: {message}")]
    BindFailed { addr: String, message: String },

    #[error("server task failed: {message}")]
    ServeFailed { message: String },
}

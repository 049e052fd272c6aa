//! Advisory service error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AdvisoryError {
    #[error("advisory request failed: {message}")]
    RequestFailed { message: String },

    #[error("advisory service returned status {status}")]
    ServiceStatus { status: u16 },

    #[error("advisory request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("advisory response parse failed: {message}")]
    MalformedResponse { message: String },

    #[error("advisory response misaligned: sent {queries} queries, got {results} results")]
    ResultCountMismatch { queries: usize, results: usize },
}

//! Reporting client error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to write report artifact to {path}: {message}")]
    ArtifactWriteFailed { path: String, message: String },

    #[error("report submission failed: {message}")]
    SubmissionFailed { message: String },

    #[error("collector returned status {status}: {body}")]
    CollectorStatus { status: u16, body: String },

    #[error("report serialization failed: {message}")]
    SerializeFailed { message: String },
}

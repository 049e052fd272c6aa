//! Remediation error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RemediateError {
    #[error("failed to spawn {command}: {message}")]
    SpawnFailed { command: String, message: String },
}

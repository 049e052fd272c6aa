//! Analysis poller and summarizer error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("summarizer request failed: {message}")]
    RequestFailed { message: String },

    #[error("summarizer returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("summarizer response parse failed: {message}")]
    ResponseParseFailed { message: String },

    #[error("summarizer returned no choices")]
    NoChoiceInResponse,

    #[error("summarizer returned an empty message")]
    EmptyMessage,
}

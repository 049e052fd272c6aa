//! Configuration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("config parse error: {message}")]
    ParseError { message: String },

    #[error("invalid config value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for vigil
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (TOML)
//! - Environment variables (`VIGIL_*`)
//! - CLI flags (applied by the binaries)

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use vigil_errors::{ConfigError, Error};

/// Agent-side configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub advisory: AdvisoryConfig,

    #[serde(default)]
    pub remediate: RemediateConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Collector endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_collector_url")]
    pub url: String,
    /// Bearer token issued at registration; empty means unregistered
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
    #[serde(default = "default_submit_timeout")]
    pub timeout_seconds: u64,
}

/// Advisory service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    #[serde(default = "default_advisory_url")]
    pub url: String,
    #[serde(default = "default_advisory_timeout")]
    pub timeout_seconds: u64,
}

/// Remediation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediateConfig {
    #[serde(default)]
    pub enabled: bool,
    /// One of `os`, `lang`, `all`
    #[serde(default = "default_remediate_scope")]
    pub scope: String,
}

/// Scheduling loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

/// Hub-side configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Ingestion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

/// Analysis poller and summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_summarizer_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_summarizer_model")]
    pub model: String,
    #[serde(default = "default_poll_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_summarizer_timeout")]
    pub timeout_seconds: u64,
}

// Default implementations

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: default_collector_url(),
            token: String::new(),
            artifact_path: default_artifact_path(),
            timeout_seconds: default_submit_timeout(),
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            url: default_advisory_url(),
            timeout_seconds: default_advisory_timeout(),
        }
    }
}

impl Default for RemediateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scope: default_remediate_scope(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            database_path: default_database_path(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_summarizer_url(),
            api_key: String::new(),
            model: default_summarizer_model(),
            interval_seconds: default_poll_interval(),
            timeout_seconds: default_summarizer_timeout(),
        }
    }
}

// Default value functions for serde

fn default_collector_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_artifact_path() -> String {
    "cve_report.json".to_string()
}

fn default_submit_timeout() -> u64 {
    60
}

fn default_advisory_url() -> String {
    "https://api.osv.dev/v1/querybatch".to_string()
}

fn default_advisory_timeout() -> u64 {
    60
}

fn default_remediate_scope() -> String {
    "os".to_string()
}

fn default_interval_minutes() -> u64 {
    60
}

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_path() -> String {
    "vigil.sqlite".to_string()
}

fn default_summarizer_url() -> String {
    "http://127.0.0.1:11434/v1/chat/completions".to_string()
}

fn default_summarizer_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_summarizer_timeout() -> u64 {
    120
}

impl AgentConfig {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        load_toml(path).await
    }

    /// Load configuration from an optional path or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed. A missing optional path yields defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load_from_file(p).await,
            None => Ok(Self::default()),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds a value that cannot
    /// be parsed into the expected type.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(url) = std::env::var("VIGIL_COLLECTOR_URL") {
            self.collector.url = url;
        }
        if let Ok(token) = std::env::var("VIGIL_AGENT_TOKEN") {
            self.collector.token = token;
        }
        if let Ok(url) = std::env::var("VIGIL_ADVISORY_URL") {
            self.advisory.url = url;
        }
        if let Ok(interval) = std::env::var("VIGIL_INTERVAL_MINUTES") {
            self.schedule.interval_minutes =
                interval.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "VIGIL_INTERVAL_MINUTES".to_string(),
                    value: interval,
                })?;
        }
        if let Ok(enabled) = std::env::var("VIGIL_REMEDIATE") {
            self.remediate.enabled = match enabled.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "VIGIL_REMEDIATE".to_string(),
                        value: enabled,
                    }
                    .into())
                }
            };
        }
        if let Ok(scope) = std::env::var("VIGIL_REMEDIATE_SCOPE") {
            validate_scope(&scope)?;
            self.remediate.scope = scope;
        }
        Ok(())
    }

    /// Validate cross-field constraints after all merging
    ///
    /// # Errors
    ///
    /// Returns an error if the remediation scope is not one of `os`,
    /// `lang`, `all`.
    pub fn validate(&self) -> Result<(), Error> {
        validate_scope(&self.remediate.scope)
    }
}

impl HubConfig {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        load_toml(path).await
    }

    /// Load configuration from an optional path or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load_from_file(p).await,
            None => Ok(Self::default()),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds a value that cannot
    /// be parsed into the expected type.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(listen) = std::env::var("VIGIL_LISTEN") {
            self.server.listen = listen;
        }
        if let Ok(path) = std::env::var("VIGIL_DATABASE_PATH") {
            self.server.database_path = path;
        }
        if let Ok(key) = std::env::var("VIGIL_SUMMARIZER_API_KEY") {
            self.analysis.api_key = key;
        }
        if let Ok(url) = std::env::var("VIGIL_SUMMARIZER_URL") {
            self.analysis.api_url = url;
        }
        if let Ok(interval) = std::env::var("VIGIL_POLL_INTERVAL_SECONDS") {
            self.analysis.interval_seconds =
                interval.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "VIGIL_POLL_INTERVAL_SECONDS".to_string(),
                    value: interval,
                })?;
        }
        Ok(())
    }
}

fn validate_scope(scope: &str) -> Result<(), Error> {
    match scope {
        "os" | "lang" | "all" => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            field: "remediate.scope".to_string(),
            value: scope.to_string(),
        }
        .into()),
    }
}

async fn load_toml<T>(path: &Path) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned,
{
    let contents = fs::read_to_string(path)
        .await
        .map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

    toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
        .map_err(Into::into)
}

//! Collector HTTP client

use std::time::Duration;
use vigil_errors::{Error, ReportError};
use vigil_types::{RegisterRequest, RegisterResponse, RunReport, SubmitResponse};

/// Collector client configuration
#[derive(Debug, Clone)]
pub struct CollectorClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CollectorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("vigil/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for the collector API
#[derive(Clone)]
pub struct CollectorClient {
    client: reqwest::Client,
    base_url: String,
}

impl CollectorClient {
    /// Create a new collector client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: CollectorClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ReportError::SubmissionFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Register this host with the collector, obtaining a bearer token
    ///
    /// Re-registering a known hostname rotates its token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn register(&self, hostname: &str) -> Result<RegisterResponse, Error> {
        let url = format!("{}/api/v1/agents/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                hostname: hostname.to_string(),
            })
            .send()
            .await
            .map_err(|e| ReportError::SubmissionFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::CollectorStatus { status, body }.into());
        }

        response
            .json()
            .await
            .map_err(|e| ReportError::SubmissionFailed {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Submit a run report with bearer-token authentication
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status. The
    /// caller decides whether that is fatal; in the pipeline it is not.
    pub async fn submit(&self, token: &str, report: &RunReport) -> Result<SubmitResponse, Error> {
        let url = format!("{}/api/v1/reports", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(report)
            .send()
            .await
            .map_err(|e| ReportError::SubmissionFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::CollectorStatus { status, body }.into());
        }

        response
            .json()
            .await
            .map_err(|e| ReportError::SubmissionFailed {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }
}

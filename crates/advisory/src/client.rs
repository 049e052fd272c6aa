//! Batched advisory query client

use crate::wire::{BatchRequest, BatchResponse, QueryEntry, QueryPackage};
use std::time::Duration;
use vigil_errors::{AdvisoryError, Error};
use vigil_types::{CorrelatedPackage, Package};

/// Advisory client configuration
#[derive(Debug, Clone)]
pub struct AdvisoryClientConfig {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AdvisoryClientConfig {
    fn default() -> Self {
        Self {
            url: "https://api.osv.dev/v1/querybatch".to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("vigil/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for the advisory batch endpoint
#[derive(Clone)]
pub struct AdvisoryClient {
    client: reqwest::Client,
    config: AdvisoryClientConfig,
}

impl AdvisoryClient {
    /// Create a new advisory client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: AdvisoryClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| AdvisoryError::RequestFailed {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(AdvisoryClientConfig::default())
    }

    /// Query the advisory service for the whole inventory in one batch
    ///
    /// Packages whose ecosystem has no advisory mapping are dropped from
    /// the batch together with their pairing, so the returned list covers
    /// exactly the queried packages. An empty query list short-circuits
    /// without a network call.
    ///
    /// # Errors
    ///
    /// Fails hard on transport errors, a non-success status, a malformed
    /// body, or a result count that does not match the query count. There
    /// is no partial parsing of a broken batch: matching results to the
    /// wrong packages would be worse than failing the run.
    pub async fn query_batch(
        &self,
        packages: &[Package],
    ) -> Result<Vec<CorrelatedPackage>, Error> {
        let mut queried = Vec::new();
        let mut queries = Vec::new();

        for package in packages {
            let Some(ecosystem) = package.ecosystem.advisory_name() else {
                continue;
            };
            queried.push(package.clone());
            queries.push(QueryEntry {
                package: QueryPackage {
                    name: package.name.clone(),
                    ecosystem: ecosystem.to_string(),
                },
                version: package.version.clone(),
            });
        }

        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let query_count = queries.len();
        tracing::debug!(queries = query_count, url = %self.config.url, "advisory batch query");

        let response = self
            .client
            .post(&self.config.url)
            .json(&BatchRequest { queries })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisoryError::Timeout {
                        seconds: self.config.timeout.as_secs(),
                    }
                } else {
                    AdvisoryError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(AdvisoryError::ServiceStatus {
                status: response.status().as_u16(),
            }
            .into());
        }

        let body: BatchResponse =
            response
                .json()
                .await
                .map_err(|e| AdvisoryError::MalformedResponse {
                    message: e.to_string(),
                })?;

        if body.results.len() != query_count {
            return Err(AdvisoryError::ResultCountMismatch {
                queries: query_count,
                results: body.results.len(),
            }
            .into());
        }

        // Pair results onto packages immediately; this is the only place
        // the positional alignment is relied upon.
        let correlated = queried
            .into_iter()
            .zip(body.results)
            .map(|(package, result)| CorrelatedPackage {
                package,
                vulns: result.vulns,
            })
            .collect();

        Ok(correlated)
    }
}

//! Single pipeline run

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vigil_advisory::{AdvisoryClient, AdvisoryClientConfig};
use vigil_config::AgentConfig;
use vigil_errors::Error;
use vigil_remediate::{remediate, CommandRunner, Scope, SystemRunner, VulnerableNames};
use vigil_report::{write_artifact, CollectorClient, CollectorClientConfig};
use vigil_types::{
    CorrelatedPackage, DetectionStatus, Finding, OsFamily, Package, RunReport,
};

/// Where the pipeline gets its package inventory
///
/// `System` queries the host's package managers; `Fixed` injects a known
/// inventory for tests.
#[derive(Debug, Clone)]
pub enum InventorySource {
    System,
    Fixed(Vec<Package>),
}

impl InventorySource {
    async fn collect(&self, os_family: OsFamily) -> Vec<Package> {
        match self {
            Self::System => vigil_inventory::collect(os_family).await,
            Self::Fixed(packages) => packages.clone(),
        }
    }
}

/// Outcome of the submission stage
#[derive(Debug, Clone)]
pub enum SubmissionStatus {
    Accepted { report_id: i64 },
    Failed { reason: String },
}

/// What one pipeline run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub artifact_path: PathBuf,
    pub submission: SubmissionStatus,
}

impl RunOutcome {
    #[must_use]
    pub fn submitted(&self) -> bool {
        matches!(self.submission, SubmissionStatus::Accepted { .. })
    }
}

/// The host-side pipeline, holding its collaborators for the process lifetime
pub struct Pipeline {
    config: AgentConfig,
    advisory: AdvisoryClient,
    collector: CollectorClient,
    runner: Arc<dyn CommandRunner>,
    inventory: InventorySource,
    os_family: OsFamily,
    hostname: String,
}

impl Pipeline {
    /// Build the pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed or the
    /// remediation scope is invalid.
    pub fn new(config: AgentConfig) -> Result<Self, Error> {
        config.validate()?;

        let advisory = AdvisoryClient::new(AdvisoryClientConfig {
            url: config.advisory.url.clone(),
            timeout: Duration::from_secs(config.advisory.timeout_seconds),
            ..AdvisoryClientConfig::default()
        })?;

        let collector = CollectorClient::new(CollectorClientConfig {
            base_url: config.collector.url.clone(),
            timeout: Duration::from_secs(config.collector.timeout_seconds),
            ..CollectorClientConfig::default()
        })?;

        Ok(Self {
            config,
            advisory,
            collector,
            runner: Arc::new(SystemRunner),
            inventory: InventorySource::System,
            os_family: vigil_inventory::detect_os_family(),
            hostname: vigil_inventory::hostname(),
        })
    }

    /// Build the pipeline from pre-constructed collaborators (test seam)
    #[must_use]
    pub fn with_parts(
        config: AgentConfig,
        advisory: AdvisoryClient,
        collector: CollectorClient,
        runner: Arc<dyn CommandRunner>,
        inventory: InventorySource,
        os_family: OsFamily,
        hostname: String,
    ) -> Self {
        Self {
            config,
            advisory,
            collector,
            runner,
            inventory,
            os_family,
            hostname,
        }
    }

    /// Execute one full pipeline run
    ///
    /// # Errors
    ///
    /// Only an artifact write failure (or invalid configuration) aborts the
    /// run; every other stage degrades per policy.
    pub async fn run_once(&self) -> Result<RunOutcome, Error> {
        tracing::info!(hostname = %self.hostname, os_family = %self.os_family, "pipeline run started");

        // Inventory: degraded sources already collapsed to empty lists
        let packages = self.inventory.collect(self.os_family).await;

        // Correlation + classification: a failed batch call aborts only
        // this stage, and the report says so explicitly
        let (detection, findings) = match self.advisory.query_batch(&packages).await {
            Ok(correlated) => (DetectionStatus::Completed, classify_findings(&correlated)),
            Err(e) => {
                tracing::warn!(error = %e, "advisory correlation failed, skipping classification");
                (
                    DetectionStatus::Failed {
                        reason: e.to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        tracing::info!(
            packages = packages.len(),
            findings = findings.len(),
            detection_completed = detection.is_completed(),
            "correlation finished"
        );

        // Optional remediation, only when something is actually vulnerable
        let remediation = if self.config.remediate.enabled && !findings.is_empty() {
            let scope: Scope = self.config.remediate.scope.parse()?;
            let vulnerable = VulnerableNames::from_findings(&findings);
            Some(remediate(self.runner.as_ref(), self.os_family, &vulnerable, scope).await)
        } else {
            None
        };

        let report = RunReport {
            hostname: self.hostname.clone(),
            os_family: self.os_family,
            generated_at: chrono::Utc::now(),
            detection,
            findings,
            remediation,
        };

        // Local persistence comes first and must not depend on the network
        let artifact_path = PathBuf::from(&self.config.collector.artifact_path);
        write_artifact(&artifact_path, &report).await?;

        let submission = match self
            .collector
            .submit(&self.config.collector.token, &report)
            .await
        {
            Ok(ack) => {
                tracing::info!(report_id = ack.report_id, "report submitted");
                SubmissionStatus::Accepted {
                    report_id: ack.report_id,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "report submission failed, artifact kept");
                SubmissionStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(RunOutcome {
            report,
            artifact_path,
            submission,
        })
    }
}

/// Derive findings from correlated advisory records
///
/// One finding per (package, record) pair, carrying the canonical
/// identifier and the max-score severity label.
#[must_use]
pub fn classify_findings(correlated: &[CorrelatedPackage]) -> Vec<Finding> {
    let discovered_at = chrono::Utc::now();

    correlated
        .iter()
        .flat_map(|entry| {
            entry.vulns.iter().map(move |record| Finding {
                package: entry.package.clone(),
                vulnerability_id: record.canonical_id().to_string(),
                severity: record.classify_severity(),
                discovered_at,
            })
        })
        .collect()
}

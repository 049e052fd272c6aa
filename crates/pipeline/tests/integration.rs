//! End-to-end pipeline tests against mocked collaborators

use async_trait::async_trait;
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use vigil_advisory::{AdvisoryClient, AdvisoryClientConfig};
use vigil_config::AgentConfig;
use vigil_errors::Error;
use vigil_pipeline::{InventorySource, Pipeline, SubmissionStatus};
use vigil_remediate::{CommandRunner, Step, StepOutput};
use vigil_report::{CollectorClient, CollectorClientConfig};
use vigil_types::{DetectionStatus, Ecosystem, OsFamily, Package, RunReport, Severity};

struct EchoRunner;

#[async_trait]
impl CommandRunner for EchoRunner {
    async fn run(&self, step: &Step) -> Result<StepOutput, Error> {
        Ok(StepOutput {
            success: true,
            stdout: format!("ok: {}", step.command_line()),
            stderr: String::new(),
        })
    }
}

struct TestHarness {
    advisory_server: MockServer,
    collector_server: MockServer,
    _artifact_dir: tempfile::TempDir,
    artifact_path: std::path::PathBuf,
    config: AgentConfig,
}

impl TestHarness {
    fn new() -> Self {
        let advisory_server = MockServer::start();
        let collector_server = MockServer::start();
        let artifact_dir = tempfile::TempDir::new().unwrap();
        let artifact_path = artifact_dir.path().join("cve_report.json");

        let mut config = AgentConfig::default();
        config.collector.url = collector_server.base_url();
        config.collector.token = "tok-abc".to_string();
        config.collector.artifact_path = artifact_path.display().to_string();
        config.advisory.url = advisory_server.url("/v1/querybatch");

        Self {
            advisory_server,
            collector_server,
            _artifact_dir: artifact_dir,
            artifact_path,
            config,
        }
    }

    fn pipeline(&self, inventory: Vec<Package>) -> Pipeline {
        let advisory = AdvisoryClient::new(AdvisoryClientConfig {
            url: self.config.advisory.url.clone(),
            timeout: Duration::from_secs(5),
            user_agent: "vigil-test".to_string(),
        })
        .unwrap();

        let collector = CollectorClient::new(CollectorClientConfig {
            base_url: self.config.collector.url.clone(),
            timeout: Duration::from_secs(5),
            user_agent: "vigil-test".to_string(),
        })
        .unwrap();

        Pipeline::with_parts(
            self.config.clone(),
            advisory,
            collector,
            Arc::new(EchoRunner),
            InventorySource::Fixed(inventory),
            OsFamily::Debian,
            "web-01".to_string(),
        )
    }
}

fn openssl_inventory() -> Vec<Package> {
    vec![Package::new("openssl", "1.1.1", Ecosystem::OsDebian)]
}

#[tokio::test]
async fn test_end_to_end_single_finding() {
    let harness = TestHarness::new();

    harness.advisory_server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch").json_body(serde_json::json!({
            "queries": [
                {"package": {"name": "openssl", "ecosystem": "Debian"}, "version": "1.1.1"},
            ]
        }));
        then.status(200).json_body(serde_json::json!({
            "results": [
                {"vulns": [{
                    "id": "CVE-2023-9999",
                    "severity": [{"type": "CVSS_V3", "score": "8.2"}]
                }]},
            ]
        }));
    });

    let submit_mock = harness.collector_server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/reports")
            .header("authorization", "Bearer tok-abc");
        then.status(200)
            .json_body(serde_json::json!({"status": "ok", "report_id": 1}));
    });

    let outcome = harness
        .pipeline(openssl_inventory())
        .run_once()
        .await
        .unwrap();
    submit_mock.assert();

    // Exactly one finding, classified HIGH from the 8.2 score
    assert_eq!(outcome.report.findings.len(), 1);
    let finding = &outcome.report.findings[0];
    assert_eq!(finding.vulnerability_id, "CVE-2023-9999");
    assert_eq!(finding.severity, Severity::High);
    assert_eq!(finding.package.name, "openssl");
    assert_eq!(outcome.report.detection, DetectionStatus::Completed);
    assert!(outcome.submitted());

    // The artifact on disk is exactly the payload that was submitted
    let artifact: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&harness.artifact_path).unwrap()).unwrap();
    let submitted = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(artifact, submitted);
}

#[tokio::test]
async fn test_advisory_failure_degrades_to_failed_detection() {
    let harness = TestHarness::new();

    harness.advisory_server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        then.status(500).body("internal error");
    });
    let submit_mock = harness.collector_server.mock(|when, then| {
        when.method(POST).path("/api/v1/reports");
        then.status(200)
            .json_body(serde_json::json!({"status": "ok", "report_id": 2}));
    });

    let outcome = harness
        .pipeline(openssl_inventory())
        .run_once()
        .await
        .unwrap();

    // The run completed, the report was still submitted, and the payload
    // says detection failed rather than claiming zero findings
    submit_mock.assert();
    assert!(outcome.report.findings.is_empty());
    assert!(matches!(
        outcome.report.detection,
        DetectionStatus::Failed { .. }
    ));

    let artifact: RunReport =
        serde_json::from_str(&std::fs::read_to_string(&harness.artifact_path).unwrap()).unwrap();
    assert!(matches!(artifact.detection, DetectionStatus::Failed { .. }));
}

#[tokio::test]
async fn test_submission_failure_keeps_artifact_and_run_succeeds() {
    let harness = TestHarness::new();

    harness.advisory_server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        then.status(200)
            .json_body(serde_json::json!({"results": [{}]}));
    });
    harness.collector_server.mock(|when, then| {
        when.method(POST).path("/api/v1/reports");
        then.status(503).body("collector down");
    });

    let outcome = harness
        .pipeline(openssl_inventory())
        .run_once()
        .await
        .unwrap();

    assert!(matches!(
        outcome.submission,
        SubmissionStatus::Failed { .. }
    ));
    assert!(harness.artifact_path.exists());
}

#[tokio::test]
async fn test_empty_inventory_completes_without_advisory_call() {
    let harness = TestHarness::new();

    // No advisory mock: a request would 404 and mark detection failed
    let submit_mock = harness.collector_server.mock(|when, then| {
        when.method(POST).path("/api/v1/reports");
        then.status(200)
            .json_body(serde_json::json!({"status": "ok", "report_id": 3}));
    });

    let outcome = harness.pipeline(Vec::new()).run_once().await.unwrap();

    submit_mock.assert();
    assert_eq!(outcome.report.detection, DetectionStatus::Completed);
    assert!(outcome.report.findings.is_empty());
}

#[tokio::test]
async fn test_remediation_log_lands_in_report() {
    let harness = TestHarness::new();
    let mut config = harness.config.clone();
    config.remediate.enabled = true;
    config.remediate.scope = "os".to_string();

    harness.advisory_server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        then.status(200).json_body(serde_json::json!({
            "results": [{"vulns": [{"id": "CVE-2024-1111", "severity": [{"score": "9.8"}]}]}]
        }));
    });
    harness.collector_server.mock(|when, then| {
        when.method(POST).path("/api/v1/reports");
        then.status(200)
            .json_body(serde_json::json!({"status": "ok", "report_id": 4}));
    });

    let advisory = AdvisoryClient::new(AdvisoryClientConfig {
        url: config.advisory.url.clone(),
        timeout: Duration::from_secs(5),
        user_agent: "vigil-test".to_string(),
    })
    .unwrap();
    let collector = CollectorClient::new(CollectorClientConfig {
        base_url: config.collector.url.clone(),
        timeout: Duration::from_secs(5),
        user_agent: "vigil-test".to_string(),
    })
    .unwrap();

    let pipeline = Pipeline::with_parts(
        config,
        advisory,
        collector,
        Arc::new(EchoRunner),
        InventorySource::Fixed(openssl_inventory()),
        OsFamily::Debian,
        "web-01".to_string(),
    );

    let outcome = pipeline.run_once().await.unwrap();

    let remediation = outcome.report.remediation.expect("remediation log");
    let os_log = &remediation["os"];
    assert!(os_log.contains("$ apt-get update"));
    assert!(os_log.contains("--only-upgrade openssl"));
}

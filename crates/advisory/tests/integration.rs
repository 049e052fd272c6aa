//! Integration tests for the advisory correlator

use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use vigil_advisory::{AdvisoryClient, AdvisoryClientConfig};
use vigil_types::{Ecosystem, Package, Severity};

fn client_for(server: &MockServer) -> AdvisoryClient {
    AdvisoryClient::new(AdvisoryClientConfig {
        url: server.url("/v1/querybatch"),
        timeout: Duration::from_secs(5),
        user_agent: "vigil-test".to_string(),
    })
    .unwrap()
}

fn sample_inventory() -> Vec<Package> {
    vec![
        Package::new("openssl", "1.1.1n", Ecosystem::OsDebian),
        Package::new("bash", "5.1", Ecosystem::OsDebian),
        Package::new("requests", "2.19.0", Ecosystem::LangIndex),
    ]
}

#[tokio::test]
async fn test_results_pair_back_by_position() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch").json_body(json!({
            "queries": [
                {"package": {"name": "openssl", "ecosystem": "Debian"}, "version": "1.1.1n"},
                {"package": {"name": "bash", "ecosystem": "Debian"}, "version": "5.1"},
                {"package": {"name": "requests", "ecosystem": "PyPI"}, "version": "2.19.0"},
            ]
        }));
        then.status(200).json_body(json!({
            "results": [
                {"vulns": [
                    {"id": "OSV-1", "aliases": ["CVE-2023-0001"]},
                    {"id": "OSV-2"},
                ]},
                {},
                {"vulns": [{"id": "OSV-3", "severity": [{"type": "CVSS_V3", "score": "8.1"}]}]},
            ]
        }));
    });

    let correlated = client_for(&server)
        .query_batch(&sample_inventory())
        .await
        .unwrap();
    mock.assert();

    // Interleaved multi- and zero-vulnerability results stay aligned
    assert_eq!(correlated.len(), 3);
    assert_eq!(correlated[0].package.name, "openssl");
    assert_eq!(correlated[0].vulns.len(), 2);
    assert_eq!(correlated[0].vulns[0].canonical_id(), "CVE-2023-0001");
    assert_eq!(correlated[1].package.name, "bash");
    assert!(correlated[1].vulns.is_empty());
    assert_eq!(correlated[2].package.name, "requests");
    assert_eq!(correlated[2].vulns[0].classify_severity(), Severity::High);
}

#[tokio::test]
async fn test_unmapped_ecosystem_dropped_with_its_pairing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch").json_body(json!({
            "queries": [
                {"package": {"name": "requests", "ecosystem": "PyPI"}, "version": "2.19.0"},
            ]
        }));
        then.status(200)
            .json_body(json!({"results": [{"vulns": [{"id": "OSV-9"}]}]}));
    });

    let packages = vec![
        Package::new("mystery", "1.0", Ecosystem::Unknown),
        Package::new("requests", "2.19.0", Ecosystem::LangIndex),
    ];

    let correlated = client_for(&server).query_batch(&packages).await.unwrap();
    mock.assert();

    assert_eq!(correlated.len(), 1);
    assert_eq!(correlated[0].package.name, "requests");
}

#[tokio::test]
async fn test_empty_inventory_short_circuits() {
    // Unroutable URL: a network call would fail, proving none is made
    let client = AdvisoryClient::new(AdvisoryClientConfig {
        url: "http://192.0.2.1:9/querybatch".to_string(),
        timeout: Duration::from_secs(1),
        user_agent: "vigil-test".to_string(),
    })
    .unwrap();

    let correlated = client.query_batch(&[]).await.unwrap();
    assert!(correlated.is_empty());

    let unmapped = vec![Package::new("mystery", "1.0", Ecosystem::Unknown)];
    let correlated = client.query_batch(&unmapped).await.unwrap();
    assert!(correlated.is_empty());
}

#[tokio::test]
async fn test_non_success_status_fails_hard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        then.status(503).body("overloaded");
    });

    let result = client_for(&server).query_batch(&sample_inventory()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_result_count_mismatch_fails_hard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        // Three queries in, two results out: no partial credit
        then.status(200)
            .json_body(json!({"results": [{}, {}]}));
    });

    let result = client_for(&server).query_batch(&sample_inventory()).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("misaligned"));
}

#[tokio::test]
async fn test_malformed_body_fails_hard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/querybatch");
        then.status(200).body("not json at all");
    });

    let result = client_for(&server).query_batch(&sample_inventory()).await;
    assert!(result.is_err());
}

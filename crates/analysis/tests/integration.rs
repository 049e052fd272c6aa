//! Integration tests for the analysis poller and summarizer client

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vigil_analysis::{build_prompt, AnalysisPoller, ChatSummarizer, Summarizer, SummarizerConfig};
use vigil_errors::{AnalysisError, Error};
use vigil_store::Store;

/// Counting fake: records invocations, optionally failing on given ids
struct FakeSummarizer {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeSummarizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AnalysisError::RequestFailed {
                message: "synthetic failure".to_string(),
            }
            .into());
        }
        Ok(format!("analysis of {} bytes", prompt.len()))
    }
}

async fn store_with_reports(dir: &tempfile::TempDir, count: usize) -> (Store, Vec<i64>) {
    let store = Store::open(&dir.path().join("test.sqlite")).await.unwrap();
    let mut ids = Vec::new();
    for n in 0..count {
        ids.push(
            store
                .insert_report("web-01", &json!({"findings": [], "n": n}))
                .await
                .unwrap(),
        );
    }
    (store, ids)
}

#[tokio::test]
async fn test_cycle_analyzes_pending_reports() {
    let dir = tempfile::TempDir::new().unwrap();
    let (store, ids) = store_with_reports(&dir, 2).await;
    let summarizer = Arc::new(FakeSummarizer::new());

    let poller = AnalysisPoller::new(
        store.clone(),
        summarizer.clone(),
        Duration::from_secs(30),
    );

    assert_eq!(poller.run_cycle().await, 2);
    assert_eq!(summarizer.calls(), 2);

    for id in ids {
        let detail = store.get_report(id).await.unwrap().unwrap();
        assert!(detail.analysis.unwrap().starts_with("analysis of"));
    }
}

#[tokio::test]
async fn test_analyzed_reports_are_never_summarized_again() {
    let dir = tempfile::TempDir::new().unwrap();
    let (store, _ids) = store_with_reports(&dir, 1).await;
    let summarizer = Arc::new(FakeSummarizer::new());

    let poller = AnalysisPoller::new(
        store.clone(),
        summarizer.clone(),
        Duration::from_secs(30),
    );

    assert_eq!(poller.run_cycle().await, 1);
    // A second cycle over the now-ANALYZED report must not call the
    // summarizer again
    assert_eq!(poller.run_cycle().await, 0);
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_failing_report_is_retried_next_cycle() {
    let dir = tempfile::TempDir::new().unwrap();
    let (store, ids) = store_with_reports(&dir, 1).await;
    let summarizer = Arc::new(FakeSummarizer::failing());

    let poller = AnalysisPoller::new(
        store.clone(),
        summarizer.clone(),
        Duration::from_secs(30),
    );

    // Each cycle attempts the same report again; the error is contained
    assert_eq!(poller.run_cycle().await, 0);
    assert_eq!(poller.run_cycle().await, 0);
    assert_eq!(summarizer.calls(), 2);

    let detail = store.get_report(ids[0]).await.unwrap().unwrap();
    assert!(detail.analysis.is_none());
}

#[tokio::test]
async fn test_prompt_carries_hostname_and_payload() {
    let dir = tempfile::TempDir::new().unwrap();
    let (store, ids) = store_with_reports(&dir, 1).await;

    let detail = store.get_report(ids[0]).await.unwrap().unwrap();
    let prompt = build_prompt(&detail);
    assert!(prompt.contains("web-01"));
    assert!(prompt.contains("findings"));
}

// ---------------------------------------------------------------------------
// Chat summarizer client
// ---------------------------------------------------------------------------

fn chat_summarizer(server: &MockServer, api_key: &str) -> ChatSummarizer {
    ChatSummarizer::new(SummarizerConfig {
        api_url: server.url("/v1/chat/completions"),
        api_key: api_key.to_string(),
        model: "test-model".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_chat_summarizer_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .json_body_partial(r#"{"model": "test-model", "stream": false}"#);
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "  P1: upgrade openssl  "}}]
        }));
    });

    let text = chat_summarizer(&server, "sk-test")
        .summarize("prompt text")
        .await
        .unwrap();
    mock.assert();
    assert_eq!(text, "P1: upgrade openssl");
}

#[tokio::test]
async fn test_chat_summarizer_error_statuses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("rate limited");
    });

    let err = chat_summarizer(&server, "")
        .summarize("prompt")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_chat_summarizer_empty_choices_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    });

    let err = chat_summarizer(&server, "")
        .summarize("prompt")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no choices"));
}

#[tokio::test]
async fn test_chat_summarizer_blank_content_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        }));
    });

    let err = chat_summarizer(&server, "")
        .summarize("prompt")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("empty"));
}

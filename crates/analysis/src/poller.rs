//! Analysis polling loop

use crate::summarizer::Summarizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use vigil_store::Store;
use vigil_types::ReportDetail;

/// Long-running poller that fills in missing report analysis
///
/// Each cycle selects reports whose analysis field is null or empty and
/// drives the summarizer once per report. A report that fails to
/// summarize is skipped this cycle and picked up again on the next one,
/// with no backoff and no retry ceiling.
pub struct AnalysisPoller {
    store: Store,
    summarizer: Arc<dyn Summarizer>,
    interval: Duration,
}

impl AnalysisPoller {
    #[must_use]
    pub fn new(store: Store, summarizer: Arc<dyn Summarizer>, interval: Duration) -> Self {
        Self {
            store,
            summarizer,
            interval,
        }
    }

    /// Run the polling loop until the shutdown signal fires
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }

            self.run_cycle().await;

            let sleep = tokio::time::sleep(self.interval);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            return;
                        }
                    }
                }
            }
        }
    }

    /// One polling pass; returns how many reports were analyzed
    ///
    /// Never fails as a whole: store and summarizer errors are logged per
    /// report and retried on the next cycle.
    pub async fn run_cycle(&self) -> usize {
        let pending = match self.store.reports_missing_analysis().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "analysis poll query failed");
                return 0;
            }
        };

        if pending.is_empty() {
            return 0;
        }

        tracing::info!(pending = pending.len(), "reports awaiting analysis");
        let mut analyzed = 0;

        for report in pending {
            let prompt = build_prompt(&report);

            let text = match self.summarizer.summarize(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    // Retried next cycle, forever, until fixed or removed
                    tracing::warn!(report_id = report.id, error = %e, "summarization failed");
                    continue;
                }
            };

            match self.store.attach_analysis(report.id, &text).await {
                Ok(()) => analyzed += 1,
                Err(e) => {
                    tracing::warn!(report_id = report.id, error = %e, "analysis attach failed");
                }
            }
        }

        analyzed
    }
}

/// Fixed prompt template built from the report's hostname and payload
#[must_use]
pub fn build_prompt(report: &ReportDetail) -> String {
    let payload = serde_json::to_string_pretty(&report.payload)
        .unwrap_or_else(|_| report.payload.to_string());

    format!(
        "Here is a JSON vulnerability report for host {hostname}:\n\
         {payload}\n\n\
         Write a short briefing for a security engineer:\n\
         - the most important vulnerable packages, with their CVE ids and a one-line risk note\n\
         - a priority for each (P1 critical, P2 important, P3 moderate)\n\
         - a checklist of upgrade commands (apt/yum/pip) to remediate\n\
         Be concise and concrete.",
        hostname = report.hostname,
    )
}

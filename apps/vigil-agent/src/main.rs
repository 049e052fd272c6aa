//! vigil-agent - host-side CLI
//!
//! Runs the inventory/correlation/remediation/reporting pipeline once or
//! on a schedule, and handles agent registration against the collector.

mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::process;
use std::time::Duration;
use tracing::{error, info};
use vigil_config::AgentConfig;
use vigil_errors::Error;
use vigil_pipeline::{shutdown_channel, Pipeline, Scheduler, SubmissionStatus};
use vigil_report::{CollectorClient, CollectorClientConfig};
use vigil_types::Severity;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("agent error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    info!("starting vigil-agent v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: defaults, then file, then environment.
    // A load failure here is the only startup error that is fatal to the
    // scheduling loop.
    let mut config = AgentConfig::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    config.validate()?;

    match cli.command {
        Commands::Run => {
            let pipeline = Pipeline::new(config)?;
            let outcome = pipeline.run_once().await?;
            print_outcome(&outcome);
        }

        Commands::Loop => {
            let interval = Duration::from_secs(config.schedule.interval_minutes * 60);
            let pipeline = Pipeline::new(config)?;

            let (shutdown_tx, shutdown_rx) = shutdown_channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, finishing current run");
                    let _ = shutdown_tx.send(true);
                }
            });

            info!(interval_minutes = interval.as_secs() / 60, "entering scheduling loop");
            let pipeline = &pipeline;
            Scheduler::new(interval)
                .run(shutdown_rx, move || async move {
                    match pipeline.run_once().await {
                        Ok(outcome) => print_outcome(&outcome),
                        Err(e) => error!("pipeline run failed: {}", e),
                    }
                })
                .await;
        }

        Commands::Register { hostname } => {
            let hostname = hostname.unwrap_or_else(vigil_inventory::hostname);
            let client = CollectorClient::new(CollectorClientConfig {
                base_url: config.collector.url.clone(),
                timeout: Duration::from_secs(config.collector.timeout_seconds),
                ..CollectorClientConfig::default()
            })?;

            let response = client.register(&hostname).await?;
            println!("registered {} with {}", response.hostname, config.collector.url);
            println!("token: {}", response.token);
            println!("store it as collector.token in the agent config (or VIGIL_AGENT_TOKEN)");
        }
    }

    Ok(())
}

fn print_outcome(outcome: &vigil_pipeline::RunOutcome) {
    let report = &outcome.report;
    println!(
        "[{}] vulnerabilities found: {} (critical: {}, high: {})",
        report.hostname,
        report.findings.len(),
        report.count_by_severity(Severity::Critical),
        report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::High)
            .count(),
    );
    if !report.detection.is_completed() {
        println!("warning: advisory detection failed for this run");
    }
    println!("saved local report to: {}", outcome.artifact_path.display());
    match &outcome.submission {
        SubmissionStatus::Accepted { report_id } => {
            println!("report posted, collector id: {report_id}");
        }
        SubmissionStatus::Failed { reason } => {
            println!("post failed: {reason}");
        }
    }
}

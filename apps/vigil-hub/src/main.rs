//! vigil-hub - central collector
//!
//! Serves the finding ingestion API and, when enabled, runs the analysis
//! poller against the same store. Both loops stop on ctrl-c.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use vigil_analysis::{AnalysisPoller, ChatSummarizer, SummarizerConfig};
use vigil_config::HubConfig;
use vigil_errors::Error;
use vigil_store::Store;

/// vigil-hub - finding collector and analysis driver
#[derive(Parser)]
#[command(name = "vigil-hub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Central collector: finding ingestion service and analysis poller")]
struct Cli {
    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen address override (e.g. 0.0.0.0:8000)
    #[arg(long)]
    listen: Option<String>,

    /// Database path override
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        error!("hub error: {}", e);
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
    info!("starting vigil-hub v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: defaults, then file, then environment,
    // then CLI flags
    let mut config = HubConfig::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(database) = cli.database {
        config.server.database_path = database.display().to_string();
    }

    let store = Store::open(Path::new(&config.server.database_path)).await?;
    info!(database = %config.server.database_path, "store opened");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let poller_handle = if config.analysis.enabled {
        let summarizer = Arc::new(ChatSummarizer::new(SummarizerConfig {
            api_url: config.analysis.api_url.clone(),
            api_key: config.analysis.api_key.clone(),
            model: config.analysis.model.clone(),
            timeout: Duration::from_secs(config.analysis.timeout_seconds),
        })?);

        let poller = AnalysisPoller::new(
            store.clone(),
            summarizer,
            Duration::from_secs(config.analysis.interval_seconds),
        );
        let poller_shutdown = shutdown_rx.clone();

        info!(
            interval_seconds = config.analysis.interval_seconds,
            model = %config.analysis.model,
            "analysis poller enabled"
        );
        Some(tokio::spawn(async move {
            poller.run(poller_shutdown).await;
        }))
    } else {
        info!("analysis poller disabled");
        None
    };

    vigil_server::serve(&config.server.listen, store, shutdown_rx).await?;

    if let Some(handle) = poller_handle {
        if let Err(e) = handle.await {
            error!("analysis poller task failed: {}", e);
        }
    }

    info!("vigil-hub stopped");
    Ok(())
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Collector ingestion service
//!
//! Exposes agent registration, authenticated report submission, report
//! listing/retrieval and analysis attachment over HTTP. Authentication is
//! bearer-token per agent; a missing header and an unknown token are
//! distinct error conditions (401 vs 403).

pub mod error;
mod routes;

use std::sync::Arc;
use tokio::sync::watch;
use vigil_errors::{Error, ServerError};
use vigil_store::Store;

/// Shared state for all request handlers
pub struct AppState {
    pub store: Store,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Build the axum Router (useful for testing)
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    routes::build_router(state)
}

/// Serve the ingestion API until the shutdown signal fires
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or the server
/// task fails.
pub async fn serve(
    listen: &str,
    store: Store,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Error> {
    let state = Arc::new(AppState::new(store));
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind(listen)
            .await
            .map_err(|e| ServerError::BindFailed {
                addr: listen.to_string(),
                message: e.to_string(),
            })?;

    tracing::info!(listen, "ingestion service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Channel closure counts as shutdown too
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| ServerError::ServeFailed {
            message: e.to_string(),
        })?;

    tracing::info!("ingestion service shut down");
    Ok(())
}

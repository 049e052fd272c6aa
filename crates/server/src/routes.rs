//! Route registration and handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;
use vigil_errors::{Error, StoreError};
use vigil_types::{
    AnalysisRequest, RegisterRequest, RegisterResponse, ReportDetail, ReportSummary,
    SubmitResponse,
};

use crate::error::ApiError;
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/system/health", get(health))
        .route("/api/v1/agents/register", post(register))
        .route("/api/v1/reports", post(submit_report).get(list_reports))
        .route("/api/v1/reports/{id}", get(get_report))
        .route("/api/v1/reports/{id}/analysis", post(attach_analysis))
        .layer(RequestBodyLimitLayer::new(8 * 1024 * 1024)) // 8 MB, reports carry full logs
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ---------------------------------------------------------------------------
// POST /api/v1/agents/register
// ---------------------------------------------------------------------------

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if req.hostname.trim().is_empty() {
        return Err(ApiError::BadRequest("hostname must not be empty".into()));
    }

    let token = state.store.register_agent(&req.hostname).await.map_err(|e| {
        warn!(error = %e, hostname = %req.hostname, "registration failed");
        ApiError::Internal("failed to register agent".into())
    })?;

    Ok(Json(RegisterResponse {
        hostname: req.hostname,
        token,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/reports — authenticated submission
// ---------------------------------------------------------------------------

/// Resolve the bearer token to the hostname it is bound to
///
/// A missing or malformed Authorization header and a well-formed but
/// unknown token are deliberately distinguishable failures.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    let token = header
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("bearer "))
        .map(|_| &header[7..])
        .ok_or(ApiError::MissingToken)?;

    let hostname = state.store.hostname_for_token(token).await.map_err(|e| {
        warn!(error = %e, "token lookup failed");
        ApiError::Internal("failed to authenticate".into())
    })?;

    hostname.ok_or(ApiError::InvalidToken)
}

async fn submit_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let hostname = authenticate(&state, &headers).await?;

    // Payload is stored verbatim; being well-formed JSON is the only
    // schema requirement
    let report_id = state
        .store
        .insert_report(&hostname, &payload)
        .await
        .map_err(|e| {
            warn!(error = %e, hostname = %hostname, "report insert failed");
            ApiError::Internal("failed to store report".into())
        })?;

    Ok(Json(SubmitResponse {
        status: "ok".to_string(),
        report_id,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/reports[?hostname=]
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListParams {
    hostname: Option<String>,
}

async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReportSummary>>, ApiError> {
    let reports = state
        .store
        .list_reports(params.hostname.as_deref())
        .await
        .map_err(|e| {
            warn!(error = %e, "report listing failed");
            ApiError::Internal("failed to list reports".into())
        })?;

    Ok(Json(reports))
}

// ---------------------------------------------------------------------------
// GET /api/v1/reports/{id}
// ---------------------------------------------------------------------------

async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ReportDetail>, ApiError> {
    let detail = state
        .store
        .get_report(id)
        .await
        .map_err(|e| {
            warn!(error = %e, report_id = id, "report fetch failed");
            ApiError::Internal("failed to load report".into())
        })?
        .ok_or_else(|| ApiError::NotFound(format!("report not found: {id}")))?;

    Ok(Json(detail))
}

// ---------------------------------------------------------------------------
// POST /api/v1/reports/{id}/analysis
// ---------------------------------------------------------------------------

async fn attach_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<ReportDetail>, ApiError> {
    state
        .store
        .attach_analysis(id, &req.text)
        .await
        .map_err(|e| match e {
            Error::Store(StoreError::ReportNotFound { id }) => {
                ApiError::NotFound(format!("report not found: {id}"))
            }
            e => {
                warn!(error = %e, report_id = id, "analysis attach failed");
                ApiError::Internal("failed to attach analysis".into())
            }
        })?;

    let detail = state
        .store
        .get_report(id)
        .await
        .map_err(|e| {
            warn!(error = %e, report_id = id, "report fetch failed");
            ApiError::Internal("failed to load report".into())
        })?
        .ok_or_else(|| ApiError::NotFound(format!("report not found: {id}")))?;

    Ok(Json(detail))
}

//! Wire types for the collector API
//!
//! Shared between the ingestion service and its clients (reporting client,
//! registration helper).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub hostname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub hostname: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub report_id: i64,
}

/// One row in a report listing, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: i64,
    pub hostname: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub has_analysis: bool,
}

/// Full stored record: verbatim payload plus attached analysis, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    pub id: i64,
    pub hostname: String,
    pub payload: serde_json::Value,
    pub analysis: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

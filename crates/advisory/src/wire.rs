//! Batch query wire format

use serde::{Deserialize, Serialize};
use vigil_types::AdvisoryRecord;

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest {
    pub queries: Vec<QueryEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryEntry {
    pub package: QueryPackage,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryPackage {
    pub name: String,
    pub ecosystem: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResult {
    #[serde(default)]
    pub vulns: Vec<AdvisoryRecord>,
}

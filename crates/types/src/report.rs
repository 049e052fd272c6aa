//! Run report types emitted by the host agent

use crate::package::{OsFamily, Package};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One vulnerability matched to one installed package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub package: Package,
    pub vulnerability_id: String,
    pub severity: Severity,
    pub discovered_at: chrono::DateTime<chrono::Utc>,
}

/// Whether advisory correlation ran to completion for this report
///
/// A failed lookup is deliberately distinguishable from zero findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DetectionStatus {
    Completed,
    Failed { reason: String },
}

impl DetectionStatus {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Captured remediation output, one log per target (`os`, `lang`)
pub type RemediationLog = BTreeMap<String, String>;

/// The payload one pipeline run produces and submits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub hostname: String,
    pub os_family: OsFamily,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub detection: DetectionStatus,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<RemediationLog>,
}

impl RunReport {
    /// Count findings at or above a severity level
    #[must_use]
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity >= severity).count()
    }

    /// Check whether any finding is critical
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.count_by_severity(Severity::Critical) > 0
    }
}

//! Raw advisory service record types

use crate::package::Package;
use serde::{Deserialize, Serialize};

/// One vulnerability record as returned by the advisory service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub severity: Vec<SeverityScore>,
}

/// One severity sub-record on an advisory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityScore {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<serde_json::Value>,
}

impl SeverityScore {
    /// Numeric value of this score; `None` when absent or non-numeric
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        match self.score.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A package paired with the advisory records matched to it
///
/// Built in a single pass from the batch response. This is the only shape
/// in which correlation results travel between components; the paired
/// index-aligned lists from the batch call never escape the correlator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelatedPackage {
    pub package: Package,
    pub vulns: Vec<AdvisoryRecord>,
}

impl CorrelatedPackage {
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.vulns.is_empty()
    }
}

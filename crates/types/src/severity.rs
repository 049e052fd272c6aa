//! Severity classification

use crate::advisory::{AdvisoryRecord, SeverityScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vulnerability severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No usable numeric score on the record
    Unknown,
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

impl Severity {
    /// Derive a severity label from a raw numeric score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::Unknown
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl AdvisoryRecord {
    /// Canonical vulnerability identifier
    ///
    /// Prefers the first CVE-style alias, in listed order, over the
    /// advisory service's native id.
    #[must_use]
    pub fn canonical_id(&self) -> &str {
        self.aliases
            .iter()
            .find(|alias| alias.starts_with("CVE-"))
            .map_or(self.id.as_str(), String::as_str)
    }

    /// Severity label derived from the maximum numeric sub-score
    ///
    /// Non-numeric and missing scores are skipped, not treated as zero; a
    /// record with no usable score classifies as [`Severity::Unknown`].
    #[must_use]
    pub fn classify_severity(&self) -> Severity {
        self.severity
            .iter()
            .filter_map(SeverityScore::numeric)
            .fold(None::<f64>, |max, s| {
                Some(max.map_or(s, |m| if s > m { s } else { m }))
            })
            .map_or(Severity::Unknown, Severity::from_score)
    }
}

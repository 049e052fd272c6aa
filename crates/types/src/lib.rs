#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for vigil
//!
//! Shared data model for the host agent and the collector: installed
//! packages, advisory records, severity classification, run reports and
//! the collector wire types.

pub mod advisory;
pub mod api;
pub mod package;
pub mod report;
pub mod severity;

pub use advisory::{AdvisoryRecord, CorrelatedPackage, SeverityScore};
pub use api::{
    AnalysisRequest, RegisterRequest, RegisterResponse, ReportDetail, ReportSummary,
    SubmitResponse,
};
pub use package::{Ecosystem, OsFamily, Package};
pub use report::{DetectionStatus, Finding, RemediationLog, RunReport};
pub use severity::Severity;

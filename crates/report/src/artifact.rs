//! Local audit artifact

use std::path::Path;
use vigil_errors::{Error, ReportError};
use vigil_types::RunReport;

/// Write the run report as a JSON file, overwriting any previous artifact
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or the file cannot
/// be written.
pub async fn write_artifact(path: &Path, report: &RunReport) -> Result<(), Error> {
    let bytes = serde_json::to_vec_pretty(report).map_err(|e| ReportError::SerializeFailed {
        message: e.to_string(),
    })?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ReportError::ArtifactWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(path = %path.display(), "report artifact written");
    Ok(())
}

//! Query-tool subprocess execution

use tokio::process::Command;

/// Run a query tool and return its stdout, or `None` on spawn failure or
/// non-zero exit
///
/// A missing or failing tool means "nothing to report from this source",
/// never a fatal error.
pub(crate) async fn run_query_tool(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(tool = program, error = %e, "package query tool unavailable");
            return None;
        }
    };

    if !output.status.success() {
        tracing::warn!(
            tool = program,
            code = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "package query tool failed"
        );
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

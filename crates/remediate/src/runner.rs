//! Command execution seam

use async_trait::async_trait;
use tokio::process::Command;
use vigil_errors::{Error, RemediateError};

/// One upgrade command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(|a| a.as_ref().to_string()).collect(),
        }
    }

    /// Rendered command line, as recorded in the audit log
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured output of one executed step
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for executing remediation steps
///
/// Production uses [`SystemRunner`]; tests substitute a scripted runner so
/// abort semantics are exercised without touching real package managers.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute one step and capture its output
    ///
    /// # Errors
    ///
    /// Returns an error when the step cannot be executed at all; a step
    /// that runs and exits non-zero is a successful call with
    /// `success == false`.
    async fn run(&self, step: &Step) -> Result<StepOutput, Error>;
}

/// Runs steps as real subprocesses
///
/// No privilege negotiation happens here: the process is assumed to already
/// hold sufficient rights, and a permission failure surfaces as an ordinary
/// non-zero exit captured in the log.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, step: &Step) -> Result<StepOutput, Error> {
        let output = Command::new(&step.program)
            .args(&step.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RemediateError::SpawnFailed {
                command: step.program.clone(),
                message: e.to_string(),
            })?;

        Ok(StepOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

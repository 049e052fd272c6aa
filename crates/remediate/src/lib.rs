#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Remediation orchestration
//!
//! Runs ordered package-manager upgrade sequences for the vulnerable
//! packages a run found, capturing each command line and its output
//! verbatim for the audit trail. Debian sequences stop at the first
//! failing step; the language-index steps are independent of each other.
//!
//! This crate does not verify that remediation succeeded at the
//! package-version level; verification falls out of the next scheduled
//! inventory run.

mod plan;
mod runner;

pub use runner::{CommandRunner, Step, StepOutput, SystemRunner};

use std::collections::BTreeSet;
use std::str::FromStr;
use vigil_errors::{ConfigError, Error};
use vigil_types::{Ecosystem, Finding, OsFamily, RemediationLog};

/// Which remediation targets to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Os,
    Lang,
    All,
}

impl Scope {
    #[must_use]
    pub fn includes_os(self) -> bool {
        matches!(self, Self::Os | Self::All)
    }

    #[must_use]
    pub fn includes_lang(self) -> bool {
        matches!(self, Self::Lang | Self::All)
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "os" => Ok(Self::Os),
            "lang" => Ok(Self::Lang),
            "all" => Ok(Self::All),
            _ => Err(ConfigError::InvalidValue {
                field: "remediate.scope".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Vulnerable package names grouped by upgrade target
#[derive(Debug, Clone, Default)]
pub struct VulnerableNames {
    pub os: BTreeSet<String>,
    pub lang: BTreeSet<String>,
}

impl VulnerableNames {
    /// Group finding package names by the target that can upgrade them
    #[must_use]
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut names = Self::default();
        for finding in findings {
            match finding.package.ecosystem {
                Ecosystem::OsDebian | Ecosystem::OsRpm => {
                    names.os.insert(finding.package.name.clone());
                }
                Ecosystem::LangIndex => {
                    names.lang.insert(finding.package.name.clone());
                }
                Ecosystem::Unknown => {}
            }
        }
        names
    }
}

/// Run the remediation sequences selected by `scope`
///
/// Returns one captured log per target. Never fails as a whole: a step
/// that cannot be spawned is recorded in the log the same way a failing
/// step is.
pub async fn remediate(
    runner: &dyn CommandRunner,
    os_family: OsFamily,
    vulnerable: &VulnerableNames,
    scope: Scope,
) -> RemediationLog {
    let mut log = RemediationLog::new();

    if scope.includes_os() {
        let names: Vec<String> = vulnerable.os.iter().cloned().collect();
        let text = match os_family {
            OsFamily::Debian => run_sequence(runner, &plan::debian_steps(&names), true).await,
            OsFamily::Redhat => run_sequence(runner, &plan::redhat_steps(&names), true).await,
            OsFamily::Unknown => {
                tracing::warn!("no OS remediation commands for unknown OS family");
                "no remediation commands for this OS family".to_string()
            }
        };
        log.insert("os".to_string(), text);
    }

    if scope.includes_lang() {
        let names: Vec<String> = vulnerable.lang.iter().cloned().collect();
        let text = run_sequence(runner, &plan::lang_steps(&names), false).await;
        log.insert("lang".to_string(), text);
    }

    log
}

/// Execute steps in order, capturing `$ cmd`, stdout and stderr verbatim
///
/// With `abort_on_failure`, the first failing or unspawnable step ends the
/// sequence; logs gathered so far are kept and earlier steps are never
/// rolled back.
async fn run_sequence(
    runner: &dyn CommandRunner,
    steps: &[Step],
    abort_on_failure: bool,
) -> String {
    let mut logs = Vec::new();

    for step in steps {
        let command_line = step.command_line();
        tracing::info!(command = %command_line, "remediation step");

        match runner.run(step).await {
            Ok(output) => {
                logs.push(format!("$ {command_line}\n{}\n{}", output.stdout, output.stderr));
                if !output.success {
                    tracing::warn!(command = %command_line, "remediation step failed");
                    if abort_on_failure {
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(command = %command_line, error = %e, "remediation step could not run");
                logs.push(format!("$ {command_line}\n{e}"));
                if abort_on_failure {
                    break;
                }
            }
        }
    }

    logs.join("\n")
}

//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vigil-agent - host vulnerability inventory and remediation agent
#[derive(Parser)]
#[command(name = "vigil-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Host vulnerability inventory and remediation agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline once and exit
    Run,

    /// Run the pipeline on a fixed interval until interrupted
    Loop,

    /// Register this host with the collector and print the issued token
    Register {
        /// Hostname to register (default: this host's name)
        #[arg(long)]
        hostname: Option<String>,
    },
}

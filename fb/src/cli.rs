//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FluxBridge - task lifecycle to time-series bridge
#[derive(Parser)]
#[command(
    name = "fluxbridge",
    about = "Forward task lifecycle events to a time-series endpoint",
    after_help = "Logs are written to: ~/.local/share/fluxbridge/logs/fluxbridge.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the bridge, reading host events as JSONL on stdin
    Run {
        /// Path to the host snapshot JSON
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Send a heartbeat point to verify connectivity
    Test {
        /// Override the configured endpoint URL
        #[arg(long)]
        url: Option<String>,

        /// Override the configured auth token
        #[arg(long)]
        token: Option<String>,

        /// Override the configured measurement name
        #[arg(long)]
        measurement: Option<String>,
    },

    /// Export all archived and active tasks in batches
    Import {
        /// Path to the host snapshot JSON
        #[arg(long)]
        snapshot: PathBuf,
    },
}

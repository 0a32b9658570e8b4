//! FluxBridge - task lifecycle to time-series bridge
//!
//! CLI entry point for running the bridge, testing connectivity and
//! importing history.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::io::AsyncBufReadExt;
use tracing::{debug, info};

use fluxbridge::cache::MetadataCache;
use fluxbridge::cli::{Cli, Command};
use fluxbridge::config::BridgeConfig;
use fluxbridge::deliver::{HttpSink, check_connection, write_target};
use fluxbridge::error::BridgeError;
use fluxbridge::events::{Dispatcher, DispatcherConfig, HostEvent};
use fluxbridge::host::{FileHost, HostPort};
use fluxbridge::sync::import_history;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fluxbridge")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("fluxbridge.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = BridgeConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let config_path = cli.config.clone().unwrap_or_else(BridgeConfig::default_path);

    match cli.command {
        Command::Run { snapshot } => cmd_run(config, snapshot, config_path).await,
        Command::Test { url, token, measurement } => cmd_test(config, url, token, measurement).await,
        Command::Import { snapshot } => cmd_import(config, snapshot, config_path).await,
    }
}

/// Run the dispatcher against a file host, feeding events from stdin JSONL.
async fn cmd_run(config: BridgeConfig, snapshot: PathBuf, config_path: PathBuf) -> Result<()> {
    let host = Arc::new(FileHost::new(snapshot, config_path));

    // Host-persisted config wins over the load chain when present
    let config = match host.load_config().await {
        Ok(Some(saved)) => saved,
        _ => config,
    };

    let (dispatcher, tx) = Dispatcher::new(config, DispatcherConfig::default(), host);
    let dispatcher_task = tokio::spawn(dispatcher.run());

    info!("reading host events from stdin");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match HostEvent::decode_line(line) {
            Some(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            None => debug!(line, "ignoring unrecognized message"),
        }
    }

    drop(tx);
    dispatcher_task.await.ok();
    Ok(())
}

/// Interactive connection test with optional override fields.
async fn cmd_test(
    saved: BridgeConfig,
    url: Option<String>,
    token: Option<String>,
    measurement: Option<String>,
) -> Result<()> {
    let config = BridgeConfig {
        endpoint_url: url.unwrap_or(saved.endpoint_url),
        auth_token: token.unwrap_or(saved.auth_token),
        measurement: measurement.unwrap_or(saved.measurement),
    };

    match check_connection(&HttpSink::new(), &config).await {
        Ok(()) => {
            println!("{} Connection OK", "✓".green());
            Ok(())
        }
        Err(error) => {
            eprintln!("{} Connection test failed: {}", "✗".red(), error);
            std::process::exit(1);
        }
    }
}

/// One-shot bulk import from a host snapshot.
async fn cmd_import(config: BridgeConfig, snapshot: PathBuf, config_path: PathBuf) -> Result<()> {
    let host = FileHost::new(snapshot, config_path);

    let Some(target) = write_target(&config) else {
        eprintln!("{} History import failed: {}", "✗".red(), BridgeError::NotConfigured);
        std::process::exit(1);
    };

    let mut cache = MetadataCache::new();
    let sink = HttpSink::new();
    match import_history(&host, &mut cache, &sink, &target, config.measurement()).await {
        Ok(summary) => {
            println!("{} Imported {} tasks in {} batches", "✓".green(), summary.tasks, summary.batches);
            Ok(())
        }
        Err(error) => {
            eprintln!("{} History import failed: {}", "✗".red(), error);
            std::process::exit(1);
        }
    }
}

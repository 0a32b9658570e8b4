use std::io::{self, BufRead};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::warn;

use lineproto::cli::{Cli, Command};
use lineproto::{DataPoint, WriteClient, WriteOutcome, WriteTarget, encode};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env().filter_level(level).init();
    Ok(())
}

/// Read one point per stdin line, skipping lines that do not decode.
fn read_points() -> Result<Vec<DataPoint>> {
    let mut points = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .as_ref()
            .and_then(DataPoint::from_json);
        match parsed {
            Some(point) => points.push(point),
            None => warn!("skipping undecodable point: {}", line),
        }
    }
    Ok(points)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    match cli.command {
        Command::Encode => {
            for point in read_points()? {
                if let Some(line) = encode(&point) {
                    println!("{}", line);
                }
            }
        }
        Command::Write { url, token } => {
            let points = read_points()?;
            let client = WriteClient::new();
            let target = WriteTarget::new(url, token);
            match client.write(&target, &points).await {
                Ok(WriteOutcome::Written { lines }) => {
                    println!("{} Wrote {} lines", "✓".green(), lines);
                }
                Ok(WriteOutcome::Nothing) => {
                    println!("Nothing to write");
                }
                Err(error) => {
                    eprintln!("{} Write failed: {}", "✗".red(), error);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

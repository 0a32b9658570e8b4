//! CLI definitions for the lp utility.

use clap::{Parser, Subcommand};

/// LineProto - encode and ship line protocol points
#[derive(Parser)]
#[command(name = "lp", about = "Encode and ship InfluxDB line protocol points")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Encode JSONL points from stdin to line protocol on stdout
    Encode,

    /// Encode JSONL points from stdin and POST them as one batch
    Write {
        /// Write endpoint URL
        #[arg(long)]
        url: String,

        /// API token for the Authorization header
        #[arg(long)]
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_encode() {
        let cli = Cli::parse_from(["lp", "encode"]);
        assert!(matches!(cli.command, Command::Encode));
    }

    #[test]
    fn test_cli_parse_write() {
        let cli = Cli::parse_from(["lp", "write", "--url", "http://db/write", "--token", "secret"]);
        match cli.command {
            Command::Write { url, token } => {
                assert_eq!(url, "http://db/write");
                assert_eq!(token, "secret");
            }
            _ => panic!("Expected Write command"),
        }
    }

    #[test]
    fn test_cli_write_requires_token() {
        assert!(Cli::try_parse_from(["lp", "write", "--url", "http://db/write"]).is_err());
    }
}

//! Entrypoint.

use std::time::Duration;

use clap::{Parser, Subcommand};
use clickhouse::LeaderboardEntry;
use config::Opts;
use dotenvy::dotenv;
use driver::{Driver, MAX_LEADERBOARD_LIMIT, PointsTracker};
use runtime::shutdown::ShutdownSignal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

/// Token holding points tracker
#[derive(Debug, Parser)]
#[clap(name = "points-tracker", version)]
struct Cli {
    #[clap(flatten)]
    opts: Opts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sync the leaderboard on a fixed interval until interrupted
    Run,
    /// Run a single sync pass and print its report
    Sync,
    /// Compute and record the points of one address
    Calculate {
        /// Wallet address
        address: String,
    },
    /// Print the top of the leaderboard
    Leaderboard {
        /// Number of entries to print, at most 25
        #[clap(long, default_value_t = MAX_LEADERBOARD_LIMIT)]
        limit: u64,
    },
}

#[derive(Debug, Serialize)]
struct LeaderboardLine {
    rank: u64,
    address: String,
    display_name: Option<String>,
    points: f64,
    last_updated_ms: u64,
}

impl LeaderboardLine {
    fn new(rank: u64, entry: LeaderboardEntry) -> Self {
        Self {
            rank,
            address: entry.address.to_string(),
            display_name: entry.display_name,
            points: entry.points,
            last_updated_ms: entry.last_updated,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("Points tracker starting...");

    let tracker = PointsTracker::connect(&cli.opts).await?;

    match cli.command {
        Command::Run => {
            let interval = Duration::from_secs(cli.opts.sync.interval_secs);
            let shutdown = ShutdownSignal::new()?.subscribe();
            Driver::new(tracker, interval).start_with_shutdown(Some(shutdown)).await
        }
        Command::Sync => print_json(&tracker.sync().await?),
        Command::Calculate { address } => print_json(&tracker.calculate(&address).await?),
        Command::Leaderboard { limit } => {
            let lines: Vec<_> = tracker
                .leaderboard(limit)
                .await?
                .into_iter()
                .zip(1..)
                .map(|(entry, rank)| LeaderboardLine::new(rank, entry))
                .collect();
            print_json(&lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn leaderboard_limit_defaults_to_cap() {
        let cli = Cli::try_parse_from([
            "points-tracker",
            "--clickhouse-url",
            "http://localhost:8123",
            "--rpc-url",
            "http://localhost:8545",
            "leaderboard",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Leaderboard { limit: MAX_LEADERBOARD_LIMIT }));
    }

    #[test]
    fn parses_calculate_subcommand() {
        let cli = Cli::try_parse_from([
            "points-tracker",
            "--clickhouse-url",
            "http://localhost:8123",
            "--rpc-url",
            "http://localhost:8545",
            "calculate",
            "0x35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Calculate { address } if address.starts_with("0x35")
        ));
    }
}

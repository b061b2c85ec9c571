//! Sorting Round CLI - play one head-to-head sorting round in the terminal
//! and have the grader judge the piles.

mod autoplay;
mod catalog;
mod display;
mod error;
mod keymap;
mod round;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use round::RoundOptions;
use sorting_core::config::{auto_skip_from_secs, delay_from_secs, validate_delay_secs};
use sorting_core::{ClientConfig, GradingClient, RoundConfig};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "sorting-round")]
#[command(about = "Two-player sorting round, judged by the grader service")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a round and grade the result
    Play(PlayArgs),
    /// Check that the grader is reachable
    Health(ServerArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Item catalog (JSON array of names or {name, description, tags})
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Keep catalog order instead of shuffling
    #[arg(long)]
    no_shuffle: bool,

    /// Shuffle and autoplay seed (for reproducible rounds)
    #[arg(long)]
    seed: Option<u64>,

    /// Present at most this many items (0 = all)
    #[arg(long)]
    item_limit: Option<usize>,

    /// Number of piles
    #[arg(long)]
    piles: Option<usize>,

    /// Seconds between items
    #[arg(long, value_parser = parse_seconds)]
    next_item_delay: Option<f64>,

    /// Seconds before an unsorted item is discarded (0 disables)
    #[arg(long, value_parser = parse_seconds)]
    auto_skip: Option<f64>,

    /// Let a random player sort every item
    #[arg(long)]
    autoplay: bool,

    #[command(flatten)]
    server: ServerArgs,
}

#[derive(Args)]
struct ServerArgs {
    /// Grade endpoint
    #[arg(long)]
    grade_url: Option<String>,

    /// Health endpoint
    #[arg(long)]
    health_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    validate_delay_secs(secs).map_err(str::to_string)
}

impl PlayArgs {
    fn round_config(&self, mut config: RoundConfig) -> RoundConfig {
        if self.no_shuffle {
            config.shuffle_on_start = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(limit) = self.item_limit {
            config.item_limit = limit;
        }
        if let Some(piles) = self.piles {
            config.pile_count = piles.max(1);
        }
        if let Some(secs) = self.next_item_delay {
            config.next_item_delay = delay_from_secs(secs);
        }
        if let Some(secs) = self.auto_skip {
            config.auto_skip_delay = auto_skip_from_secs(secs);
        }
        config
    }
}

impl ServerArgs {
    fn client_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.grade_url {
            config.grade_url = url.clone();
        }
        if let Some(url) = &self.health_url {
            config.health_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "warn,sorting_round=info,sorting_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Play(args) => play(args).await?,
        Command::Health(args) => health(args).await?,
    }
    Ok(())
}

async fn play(args: PlayArgs) -> Result<(), CliError> {
    let round = args.round_config(RoundConfig::from_env()?);
    let client = GradingClient::new(args.server.client_config(ClientConfig::from_env()?))?;
    debug!(?round, grade_url = %client.config().grade_url, "configuration loaded");

    let catalog = match &args.catalog {
        Some(path) => catalog::load(path)?,
        None => catalog::builtin()?,
    };

    let options = RoundOptions {
        round,
        autoplay: args.autoplay,
    };
    if round::play(catalog, options, Arc::new(client)).await? {
        info!("round complete");
    }
    Ok(())
}

async fn health(args: ServerArgs) -> Result<(), CliError> {
    let client = GradingClient::new(args.client_config(ClientConfig::from_env()?))?;
    let status = client.health_check().await?;
    println!("ok: {}  version: {}", status.ok, status.version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_round_config() {
        let cli = Cli::parse_from([
            "sorting-round",
            "play",
            "--no-shuffle",
            "--seed",
            "9",
            "--piles",
            "4",
            "--auto-skip",
            "0",
            "--next-item-delay",
            "0.25",
        ]);
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };

        let config = args.round_config(RoundConfig::default());
        assert!(!config.shuffle_on_start);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.pile_count, 4);
        assert_eq!(config.auto_skip_delay, None);
        assert_eq!(config.next_item_delay, Duration::from_millis(250));
        assert_eq!(config.item_limit, 0);
    }

    #[test]
    fn test_delay_flags_reject_values_too_large() {
        for flag in ["--auto-skip", "--next-item-delay"] {
            let parsed = Cli::try_parse_from(["sorting-round", "play", flag, "1e20"]);
            assert!(parsed.is_err(), "{flag} accepted 1e20");
        }
        assert!(Cli::try_parse_from(["sorting-round", "play", "--auto-skip", "0"]).is_ok());
    }

    #[test]
    fn test_unset_flags_keep_env_values() {
        let cli = Cli::parse_from(["sorting-round", "play"]);
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        let base = RoundConfig {
            item_limit: 3,
            ..RoundConfig::default()
        };
        assert_eq!(args.round_config(base.clone()), base);
    }

    #[test]
    fn test_flags_override_client_config() {
        let cli = Cli::parse_from([
            "sorting-round",
            "-v",
            "health",
            "--health-url",
            "http://grader:3000/health",
            "--timeout",
            "0",
        ]);
        assert!(cli.verbose);
        let Command::Health(args) = cli.command else {
            panic!("expected health");
        };

        let config = args.client_config(ClientConfig::default());
        assert_eq!(config.health_url, "http://grader:3000/health");
        assert_eq!(config.grade_url, "http://localhost:3000/grade");
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}

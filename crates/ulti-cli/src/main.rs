//! Ultimate stats command line tool
//!
//! Examples:
//!   ultistats report --events game.jsonl --game-id g1 --home hustle --away glory --year 2024
//!   ultistats season --rows rows.jsonl --career --per-game
//!   ultistats default-config > analysis.toml

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ulti_cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

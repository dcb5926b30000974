//! Command implementations for the `ultistats` binary.
//!
//! Every command loads its inputs from disk, runs the engine and renders a
//! JSON document. Writing that document to a file or stdout is left to
//! [`run`].

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ulti_analysis::{default_config_toml, AnalysisConfig, GameAnalyzer};
use ulti_events::{read_events_jsonl, read_jsonl, GameLog, GameMetadata, PlayerDirectory, SeasonDirectory};
use ulti_stats::{Granularity, LeaderQuery, PlayerGameRow, StatKey, StatsCollector, TeamGameRow};

/// Ultimate play-by-play and possession stats
#[derive(Parser, Debug)]
#[command(name = "ultistats")]
#[command(about = "Play-by-play and possession analytics for ultimate games")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write output here instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconstruct play-by-play for both teams
    PlayByPlay(GameArgs),
    /// Possession tallies and percentages for both teams
    Possessions(GameArgs),
    /// Full game report
    Report(GameArgs),
    /// Season or career totals from per-game rows
    Season(SeasonArgs),
    /// Print the default analyzer configuration
    DefaultConfig,
}

/// Inputs shared by the per-game commands.
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// JSONL event log containing both teams' rows
    #[arg(long)]
    pub events: PathBuf,

    #[arg(long)]
    pub game_id: String,

    /// Home team id
    #[arg(long)]
    pub home: String,

    /// Away team id
    #[arg(long)]
    pub away: String,

    /// Season year, used to pick player names
    #[arg(long)]
    pub year: u16,

    /// Player name directory (one season, or keyed by year)
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Analyzer configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SeasonArgs {
    /// JSONL of per-game player rows
    #[arg(long)]
    pub rows: PathBuf,

    /// JSONL of per-game team rows
    #[arg(long)]
    pub team_rows: Option<PathBuf>,

    /// Group by player across seasons
    #[arg(long)]
    pub career: bool,

    /// Include per-game averages
    #[arg(long)]
    pub per_game: bool,

    /// Print a leaderboard for this stat instead of full totals
    #[arg(long)]
    pub leaders: Option<StatKey>,

    /// Leaderboard length
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Minimum games played to appear on a leaderboard
    #[arg(long, default_value_t = 0)]
    pub min_games: u32,
}

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let rendered = render(&cli.command)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing output to {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Produces the text a command prints.
pub fn render(command: &Command) -> Result<String> {
    match command {
        Command::PlayByPlay(args) => {
            let (analyzer, log, names) = load_game(args)?;
            let points = analyzer.play_by_play(&log, &names)?;
            Ok(serde_json::to_string_pretty(&points)?)
        }
        Command::Possessions(args) => {
            let (analyzer, log, _) = load_game(args)?;
            let reports = [
                analyzer.possessions(&log, ulti_events::TeamSide::Home)?,
                analyzer.possessions(&log, ulti_events::TeamSide::Away)?,
            ];
            Ok(serde_json::to_string_pretty(&reports)?)
        }
        Command::Report(args) => {
            let (analyzer, log, names) = load_game(args)?;
            let report = analyzer.analyze(&log, &names)?;
            Ok(report.to_json()?)
        }
        Command::Season(args) => render_season(args),
        Command::DefaultConfig => Ok(default_config_toml()),
    }
}

fn render_season(args: &SeasonArgs) -> Result<String> {
    let mut collector = StatsCollector::new();
    let rows: Vec<PlayerGameRow> = read_jsonl(open(&args.rows)?)
        .with_context(|| format!("parsing player rows in {}", args.rows.display()))?;
    collector.record_player_rows(rows);

    if let Some(path) = &args.team_rows {
        let rows: Vec<TeamGameRow> = read_jsonl(open(path)?)
            .with_context(|| format!("parsing team rows in {}", path.display()))?;
        for row in rows {
            collector.record_team_row(row);
        }
    }

    let granularity = if args.career {
        Granularity::Career
    } else {
        Granularity::Season
    };

    if let Some(key) = args.leaders {
        let query = LeaderQuery::new(key, args.limit).min_games(args.min_games);
        return Ok(serde_json::to_string_pretty(&collector.leaders(granularity, query))?);
    }

    let summary = collector.generate_stats(granularity, args.per_game);
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn load_game(args: &GameArgs) -> Result<(GameAnalyzer, GameLog, PlayerDirectory)> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let events = read_events_jsonl(open(&args.events)?)
        .with_context(|| format!("parsing events in {}", args.events.display()))?;
    let metadata = GameMetadata::new(&args.game_id, &args.home, &args.away, args.year);
    let log = GameLog::from_events(metadata, events);
    tracing::info!(
        game_id = %args.game_id,
        home_events = log.home_events.len(),
        away_events = log.away_events.len(),
        "events loaded"
    );

    let names = match &args.names {
        Some(path) => load_names(path, args.year)?,
        None => PlayerDirectory::new(args.year),
    };

    Ok((GameAnalyzer::new(config), log, names))
}

/// Loads a name directory, accepting a single season or a by-year map.
pub fn load_names(path: &Path, year: u16) -> Result<PlayerDirectory> {
    let value: serde_json::Value = serde_json::from_reader(open(path)?)
        .with_context(|| format!("parsing names in {}", path.display()))?;

    if value.get("names").is_some() {
        return Ok(serde_json::from_value(value)?);
    }

    let seasons: SeasonDirectory = serde_json::from_value(value)?;
    match seasons.for_year(year) {
        Some(directory) => Ok(directory.clone()),
        None => {
            tracing::warn!(year, path = %path.display(), "no names for season");
            Ok(PlayerDirectory::new(year))
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

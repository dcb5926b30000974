//! Game analysis: play-by-play and possession statistics.
//!
//! The analyzer takes a finished game's event log, split by the team that
//! recorded it, and produces a narrative timeline per team plus
//! possession-based efficiency numbers (hold%, break%, line conversion,
//! red-zone conversion).
//!
//! # Architecture
//!
//! ```text
//!                          ┌──────────────┐    Vec<Point>
//!                     ┌──▶ │  playbyplay  │ ───────────────┐
//! ┌──────────┐  spans │    └──────────────┘                ▼
//! │ segment  │ ───────┤                              ┌────────────┐
//! └──────────┘        │    ┌──────────────┐ tally    │ GameReport │
//!                     └──▶ │  possession  │ ───────▶ └────────────┘
//!                          └──────────────┘   percentages
//! ```
//!
//! # Modules
//!
//! - [`classifier`]: Pass type buckets and throw geometry
//! - [`segment`]: Point boundaries, shared by both passes
//! - [`playbyplay`]: Narrative point reconstruction
//! - [`possession`]: Per-line possession and red-zone counting
//! - [`percentages`]: Efficiency percentages from a tally
//! - [`output`]: Report types and JSON writers

pub mod classifier;
pub mod config;
pub mod output;
pub mod percentages;
pub mod playbyplay;
pub mod possession;
pub mod segment;

// Re-export classifier types
pub use classifier::{classify_pass, PassClassifier, PassType, ThrowGeometry};

// Re-export config types
pub use config::{
    default_config_toml, AnalysisConfig, ClassifierConfig, ConfigError, FieldConfig, PointConfig,
    TomlSerializeError,
};

// Re-export segmentation types
pub use segment::{segment_points, LineType, PointClose, PointOpener, PointSegment, PointSegmenter, SegmentBounds};

// Re-export play-by-play types
pub use playbyplay::{reconstruct_game, PlayByPlayReconstructor, PlayEvent, PlayEventKind, Point, Scoreline};

// Re-export possession types
pub use possession::{PassMix, PossessionAggregator, PossessionSummary, PossessionTally};
pub use percentages::{percentage, round1, PercentageStats};

// Re-export output types
pub use output::{read_points_jsonl, write_json, GameReport, OutputError, TeamPossessionReport};

use std::path::Path;

use ulti_events::{GameLog, NameLookup, TeamSide};

/// Errors that can occur in analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Neither team recorded any events
    #[error("game {game_id} has no events for either team")]
    NoEvents { game_id: String },
    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Error writing output
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Runs every analysis pass over a game log.
#[derive(Debug, Clone, Default)]
pub struct GameAnalyzer {
    config: AnalysisConfig,
}

impl GameAnalyzer {
    /// Creates an analyzer with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Creates an analyzer from a configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self, AnalysisError> {
        let config = AnalysisConfig::from_file(path)?;
        Ok(Self::new(config))
    }

    /// Creates an analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Play-by-play for both teams, home points first.
    pub fn play_by_play(&self, log: &GameLog, names: &dyn NameLookup) -> Result<Vec<Point>, AnalysisError> {
        self.ensure_events(log)?;
        Ok(reconstruct_game(log, &self.config, names))
    }

    /// Possession report for one team.
    ///
    /// Fails like [`GameAnalyzer::analyze`] when neither team recorded events.
    pub fn possessions(&self, log: &GameLog, side: TeamSide) -> Result<TeamPossessionReport, AnalysisError> {
        self.ensure_events(log)?;
        let summary = PossessionAggregator::new(side, &self.config).aggregate(log.events_for(side));
        Ok(TeamPossessionReport::new(side, summary))
    }

    /// Full report for a game.
    ///
    /// Only a log where both teams are empty is an error; a single empty
    /// stream produces no points and a zero tally for that team.
    pub fn analyze(&self, log: &GameLog, names: &dyn NameLookup) -> Result<GameReport, AnalysisError> {
        let points = self.play_by_play(log, names)?;
        let home = self.possessions(log, TeamSide::Home)?;
        let away = self.possessions(log, TeamSide::Away)?;

        tracing::info!(
            game_id = %log.metadata.game_id,
            points = points.len(),
            home_holds = home.tally.o_line_scores,
            away_holds = away.tally.o_line_scores,
            "game analyzed"
        );

        Ok(GameReport {
            game_id: log.metadata.game_id.clone(),
            points,
            home,
            away,
        })
    }

    fn ensure_events(&self, log: &GameLog) -> Result<(), AnalysisError> {
        if log.is_empty() {
            return Err(AnalysisError::NoEvents {
                game_id: log.metadata.game_id.clone(),
            });
        }
        Ok(())
    }
}

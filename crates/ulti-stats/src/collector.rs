//! Stats collection across many games.
//!
//! [`StatsCollector`] accumulates per-game player and team rows and turns
//! them into season, career and per-game output on demand.

use serde::Serialize;
use std::path::Path;

use ulti_analysis::{write_json, GameReport, OutputError};
use ulti_events::{GameMetadata, TeamSide};

use crate::leaders::{leaders, LeaderEntry, LeaderQuery};
use crate::player::{career_totals, per_game, season_totals, PerGameLine, PlayerGameRow, PlayerTotals};
use crate::team::{team_season_totals, TeamGameRow, TeamSeasonTotals};

/// How player totals are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Season,
    Career,
}

/// Everything the collector can report, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_player_rows: usize,
    pub total_team_rows: usize,
    pub players: Vec<PlayerTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_game: Option<Vec<PerGameLine>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamSeasonTotals>,
}

/// Accumulates rows across games.
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    player_rows: Vec<PlayerGameRow>,
    team_rows: Vec<TeamGameRow>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_player_row(&mut self, row: PlayerGameRow) {
        self.player_rows.push(row);
    }

    pub fn record_player_rows(&mut self, rows: impl IntoIterator<Item = PlayerGameRow>) {
        self.player_rows.extend(rows);
    }

    pub fn record_team_row(&mut self, row: TeamGameRow) {
        self.team_rows.push(row);
    }

    /// Records both teams' rows from an analyzed game.
    pub fn record_game(&mut self, report: &GameReport, metadata: &GameMetadata) {
        for side in TeamSide::both() {
            self.team_rows.push(TeamGameRow::from_report(report, metadata, side));
        }
        tracing::debug!(game_id = %metadata.game_id, "recorded team rows");
    }

    pub fn player_row_count(&self) -> usize {
        self.player_rows.len()
    }

    pub fn team_row_count(&self) -> usize {
        self.team_rows.len()
    }

    /// Player totals at the requested granularity.
    pub fn player_totals(&self, granularity: Granularity) -> Vec<PlayerTotals> {
        let seasons = season_totals(&self.player_rows);
        match granularity {
            Granularity::Season => seasons,
            Granularity::Career => career_totals(&seasons),
        }
    }

    pub fn team_totals(&self) -> Vec<TeamSeasonTotals> {
        team_season_totals(&self.team_rows)
    }

    pub fn leaders(&self, granularity: Granularity, query: LeaderQuery) -> Vec<LeaderEntry> {
        leaders(&self.player_totals(granularity), query)
    }

    /// Builds the full summary.
    pub fn generate_stats(&self, granularity: Granularity, include_per_game: bool) -> StatsSummary {
        let players = self.player_totals(granularity);
        let per_game_lines = include_per_game.then(|| players.iter().map(per_game).collect());

        tracing::info!(
            players = players.len(),
            player_rows = self.player_rows.len(),
            team_rows = self.team_rows.len(),
            "stats aggregated"
        );

        StatsSummary {
            total_player_rows: self.player_rows.len(),
            total_team_rows: self.team_rows.len(),
            players,
            per_game: per_game_lines,
            teams: self.team_totals(),
        }
    }
}

/// Writes a summary as pretty JSON.
pub fn write_stats(stats: &StatsSummary, path: &Path) -> Result<(), OutputError> {
    write_json(path, stats)
}

//! Team game rows and season records.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use ulti_analysis::{GameReport, PercentageStats, PlayEventKind, PossessionTally};
use ulti_events::{GameMetadata, TeamSide};

/// One team's numbers for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamGameRow {
    pub team_id: String,
    pub game_id: String,
    pub year: u16,
    pub score_for: u32,
    pub score_against: u32,
    #[serde(default)]
    pub tally: PossessionTally,
    #[serde(default)]
    pub completions: u32,
    #[serde(default)]
    pub turnovers: u32,
    #[serde(default)]
    pub blocks: u32,
}

impl TeamGameRow {
    /// Builds a row for `side` from an analyzed game.
    ///
    /// The score comes from that team's own stream; completions, turnovers
    /// and blocks are counted from its play-by-play.
    pub fn from_report(report: &GameReport, metadata: &GameMetadata, side: TeamSide) -> Self {
        let (home, away) = report.final_score(side);
        let (score_for, score_against) = match side {
            TeamSide::Home => (home, away),
            TeamSide::Away => (away, home),
        };

        let mut row = Self {
            team_id: metadata.team_id(side).to_string(),
            game_id: metadata.game_id.clone(),
            year: metadata.year,
            score_for,
            score_against,
            tally: report.possessions(side).tally,
            ..Default::default()
        };

        for event in report.points_for(side).flat_map(|p| p.events.iter()) {
            match event.kind {
                PlayEventKind::Pass => row.completions += 1,
                PlayEventKind::Goal if event.callahan => row.blocks += 1,
                PlayEventKind::Goal => row.completions += 1,
                PlayEventKind::Throwaway | PlayEventKind::Drop | PlayEventKind::Stall => {
                    row.turnovers += 1
                }
                PlayEventKind::Block => row.blocks += 1,
                PlayEventKind::Pull
                | PlayEventKind::OpponentTurnover
                | PlayEventKind::OpponentScore => {}
            }
        }
        row
    }

    pub fn outcome(&self) -> Outcome {
        match self.score_for.cmp(&self.score_against) {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Loss,
            Ordering::Equal => Outcome::Tie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// A team's season, with percentages recomputed from the summed tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonTotals {
    pub team_id: String,
    pub year: u16,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub score_for: u32,
    pub score_against: u32,
    pub tally: PossessionTally,
    pub percentages: PercentageStats,
    pub completions: u32,
    pub turnovers: u32,
    pub blocks: u32,
}

impl TeamSeasonTotals {
    fn new(team_id: &str, year: u16) -> Self {
        Self {
            team_id: team_id.to_string(),
            year,
            games_played: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            score_for: 0,
            score_against: 0,
            tally: PossessionTally::default(),
            percentages: PercentageStats::default(),
            completions: 0,
            turnovers: 0,
            blocks: 0,
        }
    }

    fn add_game(&mut self, row: &TeamGameRow) {
        self.games_played += 1;
        match row.outcome() {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
        self.score_for += row.score_for;
        self.score_against += row.score_against;
        self.tally += row.tally;
        self.completions += row.completions;
        self.turnovers += row.turnovers;
        self.blocks += row.blocks;
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.score_for) - i64::from(self.score_against)
    }
}

/// Rolls team game rows into one record per (team, year).
pub fn team_season_totals(rows: &[TeamGameRow]) -> Vec<TeamSeasonTotals> {
    let mut seasons: BTreeMap<(&str, u16), TeamSeasonTotals> = BTreeMap::new();
    for row in rows {
        seasons
            .entry((row.team_id.as_str(), row.year))
            .or_insert_with(|| TeamSeasonTotals::new(&row.team_id, row.year))
            .add_game(row);
    }
    seasons
        .into_values()
        .map(|mut totals| {
            totals.percentages = PercentageStats::from_tally(&totals.tally);
            totals
        })
        .collect()
}

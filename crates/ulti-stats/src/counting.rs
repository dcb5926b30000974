//! Counting stats and the ratios derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use ulti_analysis::{percentage, round1};

/// Additive per-player counters.
///
/// Everything here can be summed across games. Ratios are never stored;
/// they are recomputed from the summed counters by [`Ratios::from_counts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingStats {
    pub goals: u32,
    pub assists: u32,
    pub hockey_assists: u32,
    pub blocks: u32,
    pub throwaways: u32,
    pub stalls: u32,
    pub drops: u32,
    pub callahans: u32,
    pub completions: u32,
    pub throw_attempts: u32,
    pub catches: u32,
    pub hucks_completed: u32,
    pub hucks_attempted: u32,
    pub yards_thrown: i32,
    pub yards_received: i32,
    pub o_points_played: u32,
    pub d_points_played: u32,
    pub seconds_played: u32,
    pub pulls: u32,
}

impl CountingStats {
    /// Whether the player actually took part in the game.
    pub fn participated(&self) -> bool {
        self.o_points_played > 0
            || self.d_points_played > 0
            || self.seconds_played > 0
            || self.goals > 0
            || self.assists > 0
    }

    pub fn turnovers(&self) -> u32 {
        self.throwaways + self.stalls + self.drops
    }

    pub fn points_played(&self) -> u32 {
        self.o_points_played + self.d_points_played
    }

    pub fn total_yards(&self) -> i32 {
        self.yards_thrown + self.yards_received
    }

    /// Raw value of a counting key; `None` for ratio keys.
    pub fn count(&self, key: StatKey) -> Option<f64> {
        let value = match key {
            StatKey::Goals => f64::from(self.goals),
            StatKey::Assists => f64::from(self.assists),
            StatKey::HockeyAssists => f64::from(self.hockey_assists),
            StatKey::Blocks => f64::from(self.blocks),
            StatKey::Throwaways => f64::from(self.throwaways),
            StatKey::Stalls => f64::from(self.stalls),
            StatKey::Drops => f64::from(self.drops),
            StatKey::Callahans => f64::from(self.callahans),
            StatKey::Completions => f64::from(self.completions),
            StatKey::ThrowAttempts => f64::from(self.throw_attempts),
            StatKey::Catches => f64::from(self.catches),
            StatKey::HucksCompleted => f64::from(self.hucks_completed),
            StatKey::HucksAttempted => f64::from(self.hucks_attempted),
            StatKey::YardsThrown => f64::from(self.yards_thrown),
            StatKey::YardsReceived => f64::from(self.yards_received),
            StatKey::OPointsPlayed => f64::from(self.o_points_played),
            StatKey::DPointsPlayed => f64::from(self.d_points_played),
            StatKey::SecondsPlayed => f64::from(self.seconds_played),
            StatKey::Pulls => f64::from(self.pulls),
            StatKey::CompletionPct
            | StatKey::HuckPct
            | StatKey::YardsPerTurn
            | StatKey::OffensiveEfficiency
            | StatKey::PlusMinus => return None,
        };
        Some(value)
    }
}

impl AddAssign for CountingStats {
    fn add_assign(&mut self, rhs: Self) {
        self.goals += rhs.goals;
        self.assists += rhs.assists;
        self.hockey_assists += rhs.hockey_assists;
        self.blocks += rhs.blocks;
        self.throwaways += rhs.throwaways;
        self.stalls += rhs.stalls;
        self.drops += rhs.drops;
        self.callahans += rhs.callahans;
        self.completions += rhs.completions;
        self.throw_attempts += rhs.throw_attempts;
        self.catches += rhs.catches;
        self.hucks_completed += rhs.hucks_completed;
        self.hucks_attempted += rhs.hucks_attempted;
        self.yards_thrown += rhs.yards_thrown;
        self.yards_received += rhs.yards_received;
        self.o_points_played += rhs.o_points_played;
        self.d_points_played += rhs.d_points_played;
        self.seconds_played += rhs.seconds_played;
        self.pulls += rhs.pulls;
    }
}

/// Ratio stats, derived from aggregated counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub completion_pct: f64,
    pub huck_pct: f64,
    pub yards_per_turn: f64,
    pub offensive_efficiency: f64,
    pub plus_minus: i64,
}

impl Ratios {
    pub fn from_counts(stats: &CountingStats) -> Self {
        let turnovers = stats.turnovers();
        let yards_per_turn = if turnovers == 0 {
            f64::from(stats.total_yards())
        } else {
            round1(f64::from(stats.total_yards()) / f64::from(turnovers))
        };
        Self {
            completion_pct: percentage(stats.completions, stats.throw_attempts),
            huck_pct: percentage(stats.hucks_completed, stats.hucks_attempted),
            yards_per_turn,
            offensive_efficiency: percentage(stats.goals + stats.assists, stats.points_played()),
            plus_minus: i64::from(stats.goals) + i64::from(stats.assists) + i64::from(stats.blocks)
                - i64::from(turnovers),
        }
    }

    pub fn value(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::CompletionPct => Some(self.completion_pct),
            StatKey::HuckPct => Some(self.huck_pct),
            StatKey::YardsPerTurn => Some(self.yards_per_turn),
            StatKey::OffensiveEfficiency => Some(self.offensive_efficiency),
            StatKey::PlusMinus => Some(self.plus_minus as f64),
            _ => None,
        }
    }
}

/// Every stat a leaderboard or per-game line can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Goals,
    Assists,
    HockeyAssists,
    Blocks,
    Throwaways,
    Stalls,
    Drops,
    Callahans,
    Completions,
    ThrowAttempts,
    Catches,
    HucksCompleted,
    HucksAttempted,
    YardsThrown,
    YardsReceived,
    OPointsPlayed,
    DPointsPlayed,
    SecondsPlayed,
    Pulls,
    CompletionPct,
    HuckPct,
    YardsPerTurn,
    OffensiveEfficiency,
    PlusMinus,
}

impl StatKey {
    pub fn all() -> &'static [StatKey] {
        &[
            StatKey::Goals,
            StatKey::Assists,
            StatKey::HockeyAssists,
            StatKey::Blocks,
            StatKey::Throwaways,
            StatKey::Stalls,
            StatKey::Drops,
            StatKey::Callahans,
            StatKey::Completions,
            StatKey::ThrowAttempts,
            StatKey::Catches,
            StatKey::HucksCompleted,
            StatKey::HucksAttempted,
            StatKey::YardsThrown,
            StatKey::YardsReceived,
            StatKey::OPointsPlayed,
            StatKey::DPointsPlayed,
            StatKey::SecondsPlayed,
            StatKey::Pulls,
            StatKey::CompletionPct,
            StatKey::HuckPct,
            StatKey::YardsPerTurn,
            StatKey::OffensiveEfficiency,
            StatKey::PlusMinus,
        ]
    }

    /// Counting keys sum across games; the rest are ratios.
    pub fn is_counting(self) -> bool {
        !matches!(
            self,
            StatKey::CompletionPct
                | StatKey::HuckPct
                | StatKey::YardsPerTurn
                | StatKey::OffensiveEfficiency
                | StatKey::PlusMinus
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::Goals => "goals",
            StatKey::Assists => "assists",
            StatKey::HockeyAssists => "hockey_assists",
            StatKey::Blocks => "blocks",
            StatKey::Throwaways => "throwaways",
            StatKey::Stalls => "stalls",
            StatKey::Drops => "drops",
            StatKey::Callahans => "callahans",
            StatKey::Completions => "completions",
            StatKey::ThrowAttempts => "throw_attempts",
            StatKey::Catches => "catches",
            StatKey::HucksCompleted => "hucks_completed",
            StatKey::HucksAttempted => "hucks_attempted",
            StatKey::YardsThrown => "yards_thrown",
            StatKey::YardsReceived => "yards_received",
            StatKey::OPointsPlayed => "o_points_played",
            StatKey::DPointsPlayed => "d_points_played",
            StatKey::SecondsPlayed => "seconds_played",
            StatKey::Pulls => "pulls",
            StatKey::CompletionPct => "completion_pct",
            StatKey::HuckPct => "huck_pct",
            StatKey::YardsPerTurn => "yards_per_turn",
            StatKey::OffensiveEfficiency => "offensive_efficiency",
            StatKey::PlusMinus => "plus_minus",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stat name does not match any [`StatKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stat key: {0}")]
pub struct UnknownStatKey(pub String);

impl FromStr for StatKey {
    type Err = UnknownStatKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownStatKey(s.to_string()))
    }
}

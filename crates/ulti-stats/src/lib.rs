//! Season and career stats aggregation.
//!
//! Per-game player and team rows are rolled up into season totals, career
//! totals, per-game averages and leaderboards. Counting stats are summed;
//! ratio stats are always recomputed from the summed counters, never
//! averaged across games.

pub mod collector;
pub mod counting;
pub mod leaders;
pub mod player;
pub mod team;

pub use collector::{write_stats, Granularity, StatsCollector, StatsSummary};
pub use counting::{CountingStats, Ratios, StatKey, UnknownStatKey};
pub use leaders::{leaders, LeaderEntry, LeaderQuery};
pub use player::{career_totals, per_game, season_totals, PerGameLine, PlayerGameRow, PlayerTotals};
pub use team::{team_season_totals, Outcome, TeamGameRow, TeamSeasonTotals};

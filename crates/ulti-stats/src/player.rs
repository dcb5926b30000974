//! Player rows and their season, career and per-game rollups.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use ulti_analysis::round1;

use crate::counting::{CountingStats, Ratios, StatKey};

/// One player's numbers for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameRow {
    pub player_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub game_id: String,
    pub year: u16,
    #[serde(flatten)]
    pub stats: CountingStats,
}

impl PlayerGameRow {
    pub fn new(player_id: impl Into<String>, game_id: impl Into<String>, year: u16) -> Self {
        Self {
            player_id: player_id.into(),
            game_id: game_id.into(),
            year,
            ..Default::default()
        }
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = team_id.into();
        self
    }

    pub fn with_stats(mut self, stats: CountingStats) -> Self {
        self.stats = stats;
        self
    }
}

/// Summed numbers for a player over a season or a career.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub player_id: String,
    /// Seasons covered, ascending
    pub years: Vec<u16>,
    /// Teams played for, sorted
    pub team_ids: Vec<String>,
    pub games_played: u32,
    #[serde(flatten)]
    pub stats: CountingStats,
    #[serde(flatten)]
    pub ratios: Ratios,
}

impl PlayerTotals {
    fn empty(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            years: Vec::new(),
            team_ids: Vec::new(),
            games_played: 0,
            stats: CountingStats::default(),
            ratios: Ratios::default(),
        }
    }

    /// Value of any stat key, counting or ratio.
    pub fn value(&self, key: StatKey) -> f64 {
        self.stats
            .count(key)
            .or_else(|| self.ratios.value(key))
            .unwrap_or(0.0)
    }

    /// Folds another totals line into this one and recomputes ratios.
    fn absorb(&mut self, other: &PlayerTotals) {
        self.stats += other.stats;
        self.games_played += other.games_played;
        merge_sorted(&mut self.years, other.years.iter().copied());
        merge_sorted(&mut self.team_ids, other.team_ids.iter().cloned());
        self.ratios = Ratios::from_counts(&self.stats);
    }
}

/// Per-game averages for one totals line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerGameLine {
    pub player_id: String,
    pub years: Vec<u16>,
    pub games_played: u32,
    /// Counting stats divided by games played
    pub averages: BTreeMap<StatKey, f64>,
}

impl PerGameLine {
    pub fn get(&self, key: StatKey) -> f64 {
        self.averages.get(&key).copied().unwrap_or(0.0)
    }
}

/// Accumulator for one (player, year) while walking rows.
#[derive(Default)]
struct SeasonAccumulator {
    stats: CountingStats,
    teams: BTreeSet<String>,
    games: BTreeSet<String>,
    anonymous_games: u32,
}

/// Rolls game rows into one totals line per (player, year).
///
/// Counting stats are summed over every row. `games_played` only counts
/// rows where the player participated, and ratios are recomputed from the
/// summed counters.
pub fn season_totals(rows: &[PlayerGameRow]) -> Vec<PlayerTotals> {
    let mut seasons: BTreeMap<(String, u16), SeasonAccumulator> = BTreeMap::new();

    for row in rows {
        let acc = seasons.entry((row.player_id.clone(), row.year)).or_default();
        acc.stats += row.stats;
        if !row.team_id.is_empty() {
            acc.teams.insert(row.team_id.clone());
        }
        if row.stats.participated() {
            if row.game_id.is_empty() {
                acc.anonymous_games += 1;
            } else {
                acc.games.insert(row.game_id.clone());
            }
        }
    }

    seasons
        .into_iter()
        .map(|((player_id, year), acc)| PlayerTotals {
            player_id,
            years: vec![year],
            team_ids: acc.teams.into_iter().collect(),
            games_played: acc.games.len() as u32 + acc.anonymous_games,
            ratios: Ratios::from_counts(&acc.stats),
            stats: acc.stats,
        })
        .collect()
}

/// Groups season totals by player across years.
pub fn career_totals(seasons: &[PlayerTotals]) -> Vec<PlayerTotals> {
    let mut careers: BTreeMap<&str, PlayerTotals> = BTreeMap::new();
    for season in seasons {
        careers
            .entry(season.player_id.as_str())
            .or_insert_with(|| PlayerTotals::empty(&season.player_id))
            .absorb(season);
    }
    careers.into_values().collect()
}

/// Divides every counting stat by games played; zero games gives zeros.
pub fn per_game(totals: &PlayerTotals) -> PerGameLine {
    let averages = StatKey::all()
        .iter()
        .filter_map(|&key| {
            let total = totals.stats.count(key)?;
            let average = if totals.games_played == 0 {
                0.0
            } else {
                round1(total / f64::from(totals.games_played))
            };
            Some((key, average))
        })
        .collect();

    PerGameLine {
        player_id: totals.player_id.clone(),
        years: totals.years.clone(),
        games_played: totals.games_played,
        averages,
    }
}

fn merge_sorted<T: Ord>(into: &mut Vec<T>, items: impl Iterator<Item = T>) {
    let mut set: BTreeSet<T> = into.drain(..).collect();
    set.extend(items);
    into.extend(set);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(player: &str, game: &str, year: u16, stats: CountingStats) -> PlayerGameRow {
        PlayerGameRow::new(player, game, year).with_team("hustle").with_stats(stats)
    }

    #[test]
    fn test_two_game_season() {
        let rows = vec![
            row(
                "p1",
                "g1",
                2024,
                CountingStats {
                    goals: 3,
                    o_points_played: 10,
                    ..Default::default()
                },
            ),
            row(
                "p1",
                "g2",
                2024,
                CountingStats {
                    goals: 2,
                    d_points_played: 8,
                    ..Default::default()
                },
            ),
        ];
        let totals = season_totals(&rows);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].stats.goals, 5);
        assert_eq!(totals[0].games_played, 2);

        let line = per_game(&totals[0]);
        assert_eq!(line.get(StatKey::Goals), 2.5);
        assert_eq!(line.get(StatKey::OPointsPlayed), 5.0);
    }

    #[test]
    fn test_non_participating_row_not_a_game() {
        let rows = vec![
            row(
                "p1",
                "g1",
                2024,
                CountingStats {
                    goals: 1,
                    ..Default::default()
                },
            ),
            row("p1", "g2", 2024, CountingStats::default()),
        ];
        let totals = season_totals(&rows);
        assert_eq!(totals[0].games_played, 1);
    }

    #[test]
    fn test_ratios_recomputed_not_averaged() {
        // per-game 90% and 3.3% would average to 46.7%
        let rows = vec![
            row(
                "p1",
                "g1",
                2024,
                CountingStats {
                    completions: 9,
                    throw_attempts: 10,
                    o_points_played: 5,
                    ..Default::default()
                },
            ),
            row(
                "p1",
                "g2",
                2024,
                CountingStats {
                    completions: 1,
                    throw_attempts: 30,
                    o_points_played: 5,
                    ..Default::default()
                },
            ),
        ];
        let totals = season_totals(&rows);
        assert_eq!(totals[0].ratios.completion_pct, 25.0);
    }

    #[test]
    fn test_years_kept_apart() {
        let stats = CountingStats {
            goals: 1,
            o_points_played: 1,
            ..Default::default()
        };
        let rows = vec![row("p1", "g1", 2023, stats), row("p1", "g2", 2024, stats)];
        let totals = season_totals(&rows);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].years, vec![2023]);
        assert_eq!(totals[1].years, vec![2024]);
    }

    #[test]
    fn test_career_groups_by_player() {
        let stats = CountingStats {
            goals: 2,
            assists: 1,
            o_points_played: 4,
            ..Default::default()
        };
        let rows = vec![
            row("p1", "g1", 2023, stats),
            row("p1", "g2", 2024, stats).with_team("glory"),
            row("p2", "g2", 2024, stats),
        ];
        let careers = career_totals(&season_totals(&rows));
        assert_eq!(careers.len(), 2);

        let p1 = &careers[0];
        assert_eq!(p1.player_id, "p1");
        assert_eq!(p1.years, vec![2023, 2024]);
        assert_eq!(p1.team_ids, vec!["glory", "hustle"]);
        assert_eq!(p1.games_played, 2);
        assert_eq!(p1.stats.goals, 4);
        assert_eq!(p1.ratios.offensive_efficiency, 75.0);
    }

    #[test]
    fn test_per_game_with_no_games() {
        let totals = season_totals(&[row(
            "p1",
            "g1",
            2024,
            CountingStats {
                blocks: 2,
                ..Default::default()
            },
        )]);
        assert_eq!(totals[0].games_played, 0);
        let line = per_game(&totals[0]);
        assert_eq!(line.get(StatKey::Blocks), 0.0);
        assert!(!line.averages.contains_key(&StatKey::CompletionPct));
    }

    #[test]
    fn test_value_covers_ratios() {
        let totals = season_totals(&[row(
            "p1",
            "g1",
            2024,
            CountingStats {
                completions: 3,
                throw_attempts: 4,
                o_points_played: 1,
                ..Default::default()
            },
        )]);
        assert_eq!(totals[0].value(StatKey::CompletionPct), 75.0);
        assert_eq!(totals[0].value(StatKey::Completions), 3.0);
    }

    #[test]
    fn test_row_json_is_flat() {
        let json = r#"{"player_id":"p9","game_id":"g1","year":2024,"goals":2,"o_points_played":6}"#;
        let parsed: PlayerGameRow = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.stats.goals, 2);
        assert_eq!(parsed.stats.o_points_played, 6);
        assert_eq!(parsed.team_id, "");
    }

    proptest! {
        /// Property: offensive efficiency and completion% stay within [0, 100]
        #[test]
        fn prop_season_ratios_in_range(
            games in proptest::collection::vec((0u32..5, 0u32..5, 0u32..20, 0u32..30, 0u32..30), 1..8)
        ) {
            let rows: Vec<PlayerGameRow> = games
                .iter()
                .enumerate()
                .map(|(i, &(goals, assists, points, completions, extra))| {
                    row(
                        "p1",
                        &format!("g{}", i),
                        2024,
                        CountingStats {
                            goals,
                            assists,
                            o_points_played: points + goals + assists,
                            completions,
                            throw_attempts: completions + extra,
                            ..Default::default()
                        },
                    )
                })
                .collect();
            let totals = season_totals(&rows);
            prop_assert_eq!(totals.len(), 1);
            let ratios = totals[0].ratios;
            prop_assert!((0.0..=100.0).contains(&ratios.offensive_efficiency));
            prop_assert!((0.0..=100.0).contains(&ratios.completion_pct));
            prop_assert!(totals[0].games_played as usize <= rows.len());
        }
    }
}

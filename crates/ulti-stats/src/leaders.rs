//! Leaderboards over player totals.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::counting::StatKey;
use crate::player::PlayerTotals;

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEntry {
    /// Competition rank: tied values share a rank and the next rank skips
    pub rank: u32,
    pub player_id: String,
    pub games_played: u32,
    pub value: f64,
}

/// Filters applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderQuery {
    pub key: StatKey,
    pub limit: usize,
    /// Players below this many games are left out
    pub min_games: u32,
    /// Rank ascending, for stats where lower is better
    pub ascending: bool,
}

impl LeaderQuery {
    pub fn new(key: StatKey, limit: usize) -> Self {
        Self {
            key,
            limit,
            min_games: 0,
            ascending: false,
        }
    }

    pub fn min_games(mut self, min_games: u32) -> Self {
        self.min_games = min_games;
        self
    }

    pub fn ascending(mut self) -> Self {
        self.ascending = true;
        self
    }
}

/// Top players for a single stat, descending by value by default.
///
/// Ties break on player id so the order is stable.
pub fn leaders(totals: &[PlayerTotals], query: LeaderQuery) -> Vec<LeaderEntry> {
    let mut ranked: Vec<(&PlayerTotals, f64)> = totals
        .iter()
        .filter(|t| t.games_played >= query.min_games)
        .map(|t| (t, t.value(query.key)))
        .collect();

    ranked.sort_by(|(a, av), (b, bv)| {
        let by_value = if query.ascending {
            av.partial_cmp(bv)
        } else {
            bv.partial_cmp(av)
        };
        by_value
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    let mut entries: Vec<LeaderEntry> = Vec::with_capacity(query.limit.min(ranked.len()));
    for (position, (totals, value)) in ranked.into_iter().take(query.limit).enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.value == value => prev.rank,
            _ => position as u32 + 1,
        };
        entries.push(LeaderEntry {
            rank,
            player_id: totals.player_id.clone(),
            games_played: totals.games_played,
            value,
        });
    }
    entries
}

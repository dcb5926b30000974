//! Game log container.
//!
//! Holds one finished game's metadata and both teams' ordered event streams.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

use crate::event::{GameEvent, TeamSide};

/// Identifying data for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub game_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    /// Season year, used to scope name lookups
    pub year: u16,
}

impl GameMetadata {
    pub fn new(
        game_id: impl Into<String>,
        home_team_id: impl Into<String>,
        away_team_id: impl Into<String>,
        year: u16,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            year,
        }
    }

    pub fn team_id(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home_team_id,
            TeamSide::Away => &self.away_team_id,
        }
    }
}

/// A finished game's event log, split into per-team streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub metadata: GameMetadata,
    #[serde(default)]
    pub home_events: Vec<GameEvent>,
    #[serde(default)]
    pub away_events: Vec<GameEvent>,
}

impl GameLog {
    pub fn new(
        metadata: GameMetadata,
        home_events: Vec<GameEvent>,
        away_events: Vec<GameEvent>,
    ) -> Self {
        Self {
            metadata,
            home_events,
            away_events,
        }
    }

    /// Splits a mixed, already ordered log by team, keeping relative order.
    pub fn from_events(metadata: GameMetadata, events: impl IntoIterator<Item = GameEvent>) -> Self {
        let (home_events, away_events) = events
            .into_iter()
            .partition(|event| event.team == TeamSide::Home);
        Self::new(metadata, home_events, away_events)
    }

    /// The ordered stream recorded by one team.
    pub fn events_for(&self, side: TeamSide) -> &[GameEvent] {
        match side {
            TeamSide::Home => &self.home_events,
            TeamSide::Away => &self.away_events,
        }
    }

    /// True when neither team recorded anything.
    pub fn is_empty(&self) -> bool {
        self.home_events.is_empty() && self.away_events.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.home_events.len() + self.away_events.len()
    }
}

/// Errors that can occur while loading event logs.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a JSONL event log, skipping blank lines.
pub fn read_events_jsonl(reader: impl BufRead) -> Result<Vec<GameEvent>, LoadError> {
    read_jsonl(reader)
}

/// Reads one JSON value per line, skipping blank lines.
///
/// Errors carry the 1-based line number of the offending row.
pub fn read_jsonl<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>, LoadError> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|source| LoadError::Json {
            line: index + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

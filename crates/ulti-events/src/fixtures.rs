//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // ulti-events = { path = "../ulti-events", features = ["test-fixtures"] }
//!
//! use ulti_events::fixtures;
//!
//! let log = fixtures::sample_game();
//! let names = fixtures::sample_names();
//! ```

use crate::{GameEvent, GameLog, GameMetadata, PlayerDirectory};

/// Returns every event in the sample game, home rows first.
///
/// Home stream, five points (final 2-3):
/// - O point scored through a red-zone throw
/// - D point with a block, a huck throwaway, then a break
/// - D point with an out-of-bounds pull, opponent scores
/// - O point with a drop, opponent scores, closed by end of Q1
/// - Q2 D point, stall in the red zone, still open at end of log
///
/// Away stream mirrors the same game from the other bench.
pub fn sample_events() -> Vec<GameEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_game.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            GameEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Metadata for the sample game.
pub fn sample_metadata() -> GameMetadata {
    GameMetadata::new("2024-06-08-hustle-glory", "hustle", "glory", 2024)
}

/// The sample game split into team streams.
pub fn sample_game() -> GameLog {
    GameLog::from_events(sample_metadata(), sample_events())
}

/// Returns the 2024 name directory for the sample game.
///
/// `a7` is deliberately absent.
pub fn sample_names() -> PlayerDirectory {
    let json = include_str!("../tests/fixtures/sample_names.json");
    serde_json::from_str(json).expect("Failed to parse sample_names.json")
}

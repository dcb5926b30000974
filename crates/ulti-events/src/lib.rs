//! Shared game event types and serialization for the ultimate stats engine.
//!
//! This crate contains pure data structures with no analysis logic.
//! It is a dependency for all other crates in the workspace.

pub mod clock;
pub mod event;
pub mod game;
pub mod names;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export clock types
pub use clock::{
    clock_remaining, format_duration, quarter_boundary_secs, GameClock, FALLBACK_POINT_SECS,
    QUARTER_SECS, REGULATION_QUARTERS,
};

// Re-export event types
pub use event::*;

// Re-export game container types
pub use game::{read_events_jsonl, read_jsonl, GameLog, GameMetadata, LoadError};

// Re-export name lookup types
pub use names::{NameLookup, NoNames, PlayerDirectory, SeasonDirectory};

//! Player name resolution.
//!
//! The engine only ever sees player ids; display names come from a read-only
//! lookup supplied by the caller, scoped to the season being analyzed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Resolves a player id to a display name.
pub trait NameLookup {
    fn display_name(&self, player_id: &str) -> Option<&str>;

    /// Resolves an optional id, dropping the name if either step is missing.
    fn resolve(&self, player_id: Option<&str>) -> Option<&str> {
        player_id.and_then(|id| self.display_name(id))
    }
}

/// Lookup that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameLookup for NoNames {
    fn display_name(&self, _player_id: &str) -> Option<&str> {
        None
    }
}

impl NameLookup for HashMap<String, String> {
    fn display_name(&self, player_id: &str) -> Option<&str> {
        self.get(player_id).map(String::as_str)
    }
}

/// Display names for one season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDirectory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default)]
    pub names: HashMap<String, String>,
}

impl PlayerDirectory {
    pub fn new(year: u16) -> Self {
        Self {
            year: Some(year),
            names: HashMap::new(),
        }
    }

    /// Adds a player, returning self for chaining.
    pub fn with_player(mut self, player_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(player_id.into(), name.into());
        self
    }

    pub fn insert(&mut self, player_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(player_id.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameLookup for PlayerDirectory {
    fn display_name(&self, player_id: &str) -> Option<&str> {
        self.names.get(player_id).map(String::as_str)
    }
}

/// Player directories keyed by season year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonDirectory {
    seasons: BTreeMap<u16, PlayerDirectory>,
}

impl SeasonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: u16, mut directory: PlayerDirectory) {
        directory.year = Some(year);
        self.seasons.insert(year, directory);
    }

    /// The directory for one season, if loaded.
    pub fn for_year(&self, year: u16) -> Option<&PlayerDirectory> {
        self.seasons.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.seasons.keys().copied()
    }
}

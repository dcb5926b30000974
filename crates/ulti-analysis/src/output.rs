//! Report types and JSON file output.
//!
//! A [`GameReport`] bundles both teams' play-by-play and possession reports
//! for one game. Reports can be written as pretty JSON, or as JSON Lines with
//! one point per line for tailing and diffing.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use ulti_events::TeamSide;

use crate::percentages::PercentageStats;
use crate::playbyplay::Point;
use crate::possession::{PassMix, PossessionSummary, PossessionTally};

/// Possession numbers for one team in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPossessionReport {
    pub team: TeamSide,
    pub tally: PossessionTally,
    pub percentages: PercentageStats,
    pub pass_mix: PassMix,
}

impl TeamPossessionReport {
    pub fn new(team: TeamSide, summary: PossessionSummary) -> Self {
        Self {
            team,
            percentages: PercentageStats::from_tally(&summary.tally),
            tally: summary.tally,
            pass_mix: summary.pass_mix,
        }
    }
}

/// Full analysis of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub game_id: String,
    /// Home points followed by away points
    pub points: Vec<Point>,
    pub home: TeamPossessionReport,
    pub away: TeamPossessionReport,
}

impl GameReport {
    pub fn possessions(&self, side: TeamSide) -> &TeamPossessionReport {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Points reconstructed from one team's stream.
    pub fn points_for(&self, side: TeamSide) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter().filter(move |p| p.team == side)
    }

    /// Final (home, away) score as seen by `side`'s stream.
    pub fn final_score(&self, side: TeamSide) -> (u32, u32) {
        self.points_for(side)
            .last()
            .map(|p| (p.home_score, p.away_score))
            .unwrap_or((0, 0))
    }

    /// Serializes the entire report to JSON.
    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes the entire report to compact JSON (single line).
    pub fn to_json_compact(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), OutputError> {
        write_json(path, self)
    }

    /// Writes one point per line.
    pub fn write_points_jsonl(&self, path: &Path) -> Result<(), OutputError> {
        let mut writer = BufWriter::new(File::create(path)?);
        for point in &self.points {
            writeln!(writer, "{}", serde_json::to_string(point)?)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes all report files to a directory.
    ///
    /// Creates the directory if it doesn't exist. Writes:
    /// - `report.json` - The full report
    /// - `points.jsonl` - Play-by-play, one point per line
    /// - `possessions.json` - Both teams' possession reports
    pub fn write_all(&self, output_dir: &Path) -> Result<(), OutputError> {
        fs::create_dir_all(output_dir)?;

        self.write_json(&output_dir.join("report.json"))?;
        self.write_points_jsonl(&output_dir.join("points.jsonl"))?;
        write_json(&output_dir.join("possessions.json"), &[&self.home, &self.away])?;

        Ok(())
    }

    /// Reads a report written by [`GameReport::write_json`].
    pub fn read_json(path: &Path) -> Result<Self, OutputError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Reads points written by [`GameReport::write_points_jsonl`].
pub fn read_points_jsonl(path: &Path) -> Result<Vec<Point>, OutputError> {
    let reader = BufReader::new(File::open(path)?);
    let mut points = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            points.push(serde_json::from_str(&line)?);
        }
    }
    Ok(points)
}

/// Writes any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Errors that can occur during output operations.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

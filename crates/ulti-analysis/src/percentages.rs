//! Efficiency percentages derived from a [`PossessionTally`].

use serde::{Deserialize, Serialize};

use crate::possession::PossessionTally;

/// Percentages in [0, 100], rounded to one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageStats {
    pub hold_pct: f64,
    pub break_pct: f64,
    pub o_line_conversion: f64,
    pub d_line_conversion: f64,
    pub redzone_conversion: f64,
    pub scoring_efficiency: f64,
}

impl PercentageStats {
    pub fn from_tally(tally: &PossessionTally) -> Self {
        Self {
            hold_pct: percentage(tally.o_line_scores, tally.o_line_points),
            break_pct: percentage(tally.d_line_scores, tally.d_line_points),
            o_line_conversion: percentage(tally.o_line_scores, tally.o_line_possessions),
            d_line_conversion: percentage(tally.d_line_scores, tally.d_line_possessions),
            redzone_conversion: percentage(tally.redzone_goals, tally.redzone_possessions),
            scoring_efficiency: percentage(tally.total_scores(), tally.total_points()),
        }
    }
}

impl From<&PossessionTally> for PercentageStats {
    fn from(tally: &PossessionTally) -> Self {
        Self::from_tally(tally)
    }
}

/// `numerator / denominator * 100`, rounded to one decimal.
///
/// A zero denominator gives 0, and the result is clamped to [0, 100].
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = f64::from(numerator) / f64::from(denominator) * 100.0;
    round1(raw.clamp(0.0, 100.0))
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

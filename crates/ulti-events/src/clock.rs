//! Game Clock
//!
//! Event times are recorded as seconds within the current quarter. The clock
//! turns them into absolute game seconds and formats durations for display.
//!
//! # Example
//!
//! ```
//! use ulti_events::{clock_remaining, format_duration, GameClock};
//!
//! let mut clock = GameClock::start();
//! clock.end_period(720);
//! assert_eq!(clock.quarter, 2);
//! assert_eq!(clock.absolute(30), 750);
//! assert_eq!(format_duration(90), "1m30s");
//! assert_eq!(clock_remaining(750), "11:30");
//! ```

use serde::{Deserialize, Serialize};

/// Length of a regulation quarter in seconds.
pub const QUARTER_SECS: u32 = 720;

/// Number of regulation quarters.
pub const REGULATION_QUARTERS: u8 = 4;

/// Duration assigned to a point still open when the log ends.
pub const FALLBACK_POINT_SECS: u32 = 90;

/// Absolute end time of the given regulation quarter.
pub fn quarter_boundary_secs(quarter: u8) -> u32 {
    QUARTER_SECS * u32::from(quarter)
}

/// Running quarter and the absolute time at which it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    /// Current quarter, 1-based; overtime periods continue past 4
    pub quarter: u8,
    /// Absolute seconds elapsed before the current quarter
    pub offset: u32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::start()
    }
}

impl GameClock {
    /// Clock at the opening pull.
    pub fn start() -> Self {
        Self {
            quarter: 1,
            offset: 0,
        }
    }

    /// Converts an intra-quarter event time into absolute game seconds.
    pub fn absolute(&self, event_time: u32) -> u32 {
        self.offset.saturating_add(event_time)
    }

    /// Moves to the next period, which starts at `boundary`.
    pub fn end_period(&mut self, boundary: u32) {
        self.quarter = self.quarter.saturating_add(1);
        self.offset = boundary;
    }

    /// True once regulation is over.
    pub fn in_overtime(&self) -> bool {
        self.quarter > REGULATION_QUARTERS
    }
}

/// Formats a duration as `"1m30s"`, or `"45s"` under a minute.
pub fn format_duration(secs: u32) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Game clock remaining in the quarter at an absolute time, as `"MM:SS"`.
///
/// Computed as `720 - (end_time mod 720)`, so a time on a quarter boundary
/// reads a full quarter.
pub fn clock_remaining(end_time: u32) -> String {
    let remaining = i64::from(QUARTER_SECS) - i64::from(end_time % QUARTER_SECS);
    let remaining = remaining.max(0);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(quarter_boundary_secs(1), 720);
        assert_eq!(quarter_boundary_secs(2), 1440);
        assert_eq!(quarter_boundary_secs(3), 2160);
        assert_eq!(quarter_boundary_secs(4), 2880);
    }

    #[test]
    fn test_clock_absolute_time() {
        let mut clock = GameClock::start();
        assert_eq!(clock.absolute(45), 45);

        clock.end_period(720);
        assert_eq!(clock.quarter, 2);
        assert_eq!(clock.absolute(0), 720);
        assert_eq!(clock.absolute(100), 820);
    }

    #[test]
    fn test_clock_overtime() {
        let mut clock = GameClock::start();
        for q in 1..=4 {
            clock.end_period(quarter_boundary_secs(q));
        }
        assert_eq!(clock.quarter, 5);
        assert!(clock.in_overtime());
        assert_eq!(clock.absolute(10), 2890);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1m30s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(120), "2m0s");
        assert_eq!(format_duration(720), "12m0s");
    }

    #[test]
    fn test_clock_remaining() {
        assert_eq!(clock_remaining(0), "12:00");
        assert_eq!(clock_remaining(60), "11:00");
        assert_eq!(clock_remaining(700), "00:20");
        assert_eq!(clock_remaining(720), "12:00");
        assert_eq!(clock_remaining(1439), "00:01");
        assert_eq!(clock_remaining(810), "10:30");
    }

    #[test]
    fn test_clock_serialization() {
        let clock = GameClock { quarter: 3, offset: 1440 };
        let json = serde_json::to_string(&clock).unwrap();
        assert_eq!(json, r#"{"quarter":3,"offset":1440}"#);
    }
}

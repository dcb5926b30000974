//! Event Types
//!
//! Game event definitions matching the per-team event log schema.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::quarter_boundary_secs;

/// Which side of the game an event stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Returns both sides, home first.
    pub fn both() -> [TeamSide; 2] {
        [TeamSide::Home, TeamSide::Away]
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Home => write!(f, "home"),
            TeamSide::Away => write!(f, "away"),
        }
    }
}

/// Event kinds, keyed by the numeric code used in the event log.
///
/// "Recording" is the team whose stream the event belongs to; "opposing" is
/// the other team. Codes that are not in the table deserialize into
/// [`EventKind::Unrecognized`] so a single odd row never fails a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum EventKind {
    /// Recording team starts the point on defense (pulls).
    StartDPoint,
    /// Recording team starts the point on offense (receives).
    StartOPoint,
    TimeoutRecording,
    TimeoutOpposing,
    BetweenPointTimeoutRecording,
    BetweenPointTimeoutOpposing,
    PullInbounds,
    PullOutOfBounds,
    OffsidesRecording,
    OffsidesOpposing,
    /// Recording team's defender blocks a throw.
    Block,
    /// Recording team's defender catches a goal on defense.
    CallahanCaught,
    ThrowawayByOpposing,
    StallAgainstOpposing,
    ScoreByOpposing,
    PenaltyOnRecording,
    PenaltyOnOpposing,
    /// Completed pass.
    Pass,
    /// Recording team scores.
    Score,
    Drop,
    /// Opposing team's defender blocks a recording team throw.
    BlockByOpposing,
    Throwaway,
    /// Recording team throws a Callahan to the opponent.
    CallahanThrown,
    Stall,
    Injury,
    EndOfFirstQuarter,
    Halftime,
    EndOfThirdQuarter,
    EndOfRegulation,
    EndOfOvertime,
    /// Any code missing from the table above.
    Unrecognized(u16),
}

impl EventKind {
    /// Returns the event kind for a numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => EventKind::StartDPoint,
            2 => EventKind::StartOPoint,
            3 => EventKind::TimeoutRecording,
            4 => EventKind::TimeoutOpposing,
            5 => EventKind::BetweenPointTimeoutRecording,
            6 => EventKind::BetweenPointTimeoutOpposing,
            7 => EventKind::PullInbounds,
            8 => EventKind::PullOutOfBounds,
            9 => EventKind::OffsidesRecording,
            10 => EventKind::OffsidesOpposing,
            11 => EventKind::Block,
            12 => EventKind::CallahanCaught,
            13 => EventKind::ThrowawayByOpposing,
            14 => EventKind::StallAgainstOpposing,
            15 => EventKind::ScoreByOpposing,
            16 => EventKind::PenaltyOnRecording,
            17 => EventKind::PenaltyOnOpposing,
            18 => EventKind::Pass,
            19 => EventKind::Score,
            20 => EventKind::Drop,
            21 => EventKind::BlockByOpposing,
            22 => EventKind::Throwaway,
            23 => EventKind::CallahanThrown,
            24 => EventKind::Stall,
            25 => EventKind::Injury,
            28 => EventKind::EndOfFirstQuarter,
            29 => EventKind::Halftime,
            30 => EventKind::EndOfThirdQuarter,
            31 => EventKind::EndOfRegulation,
            32 => EventKind::EndOfOvertime,
            other => EventKind::Unrecognized(other),
        }
    }

    /// Returns the numeric code for this kind.
    pub fn code(self) -> u16 {
        match self {
            EventKind::StartDPoint => 1,
            EventKind::StartOPoint => 2,
            EventKind::TimeoutRecording => 3,
            EventKind::TimeoutOpposing => 4,
            EventKind::BetweenPointTimeoutRecording => 5,
            EventKind::BetweenPointTimeoutOpposing => 6,
            EventKind::PullInbounds => 7,
            EventKind::PullOutOfBounds => 8,
            EventKind::OffsidesRecording => 9,
            EventKind::OffsidesOpposing => 10,
            EventKind::Block => 11,
            EventKind::CallahanCaught => 12,
            EventKind::ThrowawayByOpposing => 13,
            EventKind::StallAgainstOpposing => 14,
            EventKind::ScoreByOpposing => 15,
            EventKind::PenaltyOnRecording => 16,
            EventKind::PenaltyOnOpposing => 17,
            EventKind::Pass => 18,
            EventKind::Score => 19,
            EventKind::Drop => 20,
            EventKind::BlockByOpposing => 21,
            EventKind::Throwaway => 22,
            EventKind::CallahanThrown => 23,
            EventKind::Stall => 24,
            EventKind::Injury => 25,
            EventKind::EndOfFirstQuarter => 28,
            EventKind::Halftime => 29,
            EventKind::EndOfThirdQuarter => 30,
            EventKind::EndOfRegulation => 31,
            EventKind::EndOfOvertime => 32,
            EventKind::Unrecognized(code) => code,
        }
    }

    /// Returns all recognized event kinds.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::StartDPoint,
            EventKind::StartOPoint,
            EventKind::TimeoutRecording,
            EventKind::TimeoutOpposing,
            EventKind::BetweenPointTimeoutRecording,
            EventKind::BetweenPointTimeoutOpposing,
            EventKind::PullInbounds,
            EventKind::PullOutOfBounds,
            EventKind::OffsidesRecording,
            EventKind::OffsidesOpposing,
            EventKind::Block,
            EventKind::CallahanCaught,
            EventKind::ThrowawayByOpposing,
            EventKind::StallAgainstOpposing,
            EventKind::ScoreByOpposing,
            EventKind::PenaltyOnRecording,
            EventKind::PenaltyOnOpposing,
            EventKind::Pass,
            EventKind::Score,
            EventKind::Drop,
            EventKind::BlockByOpposing,
            EventKind::Throwaway,
            EventKind::CallahanThrown,
            EventKind::Stall,
            EventKind::Injury,
            EventKind::EndOfFirstQuarter,
            EventKind::Halftime,
            EventKind::EndOfThirdQuarter,
            EventKind::EndOfRegulation,
            EventKind::EndOfOvertime,
        ]
    }

    /// True for the two start-of-point kinds.
    pub fn is_point_start(self) -> bool {
        matches!(self, EventKind::StartDPoint | EventKind::StartOPoint)
    }

    /// Fixed absolute end time (seconds) for regulation period markers.
    pub fn period_boundary(self) -> Option<u32> {
        match self {
            EventKind::EndOfFirstQuarter => Some(quarter_boundary_secs(1)),
            EventKind::Halftime => Some(quarter_boundary_secs(2)),
            EventKind::EndOfThirdQuarter => Some(quarter_boundary_secs(3)),
            EventKind::EndOfRegulation => Some(quarter_boundary_secs(4)),
            _ => None,
        }
    }

    /// True for any end-of-period marker, overtime included.
    pub fn is_period_end(self) -> bool {
        self.period_boundary().is_some() || self == EventKind::EndOfOvertime
    }

    /// True for events that only happen while a point is being played.
    ///
    /// These open a point on their own when none is active.
    pub fn is_live_play(self) -> bool {
        matches!(
            self,
            EventKind::PullInbounds
                | EventKind::PullOutOfBounds
                | EventKind::Block
                | EventKind::CallahanCaught
                | EventKind::ThrowawayByOpposing
                | EventKind::StallAgainstOpposing
                | EventKind::ScoreByOpposing
                | EventKind::Pass
                | EventKind::Score
                | EventKind::Drop
                | EventKind::BlockByOpposing
                | EventKind::Throwaway
                | EventKind::CallahanThrown
                | EventKind::Stall
        )
    }

    /// True if the recording team scores with this event.
    pub fn is_recording_score(self) -> bool {
        matches!(self, EventKind::Score | EventKind::CallahanCaught)
    }

    /// True if the opposing team scores with this event.
    pub fn is_opposing_score(self) -> bool {
        matches!(self, EventKind::ScoreByOpposing | EventKind::CallahanThrown)
    }
}

impl From<u16> for EventKind {
    fn from(code: u16) -> Self {
        EventKind::from_code(code)
    }
}

impl From<EventKind> for u16 {
    fn from(kind: EventKind) -> Self {
        kind.code()
    }
}

/// A position on the field in yards.
///
/// `y` runs from the defended goal line (0) toward the attacked end zone;
/// the attacking goal line sits at 100 and the end zone ends at 120.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

impl FieldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a point only when both coordinates are present.
    pub fn from_parts(x: Option<f64>, y: Option<f64>) -> Option<Self> {
        Some(Self { x: x?, y: y? })
    }
}

/// A single row of a team's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Event kind code
    pub event_type: EventKind,
    /// Team whose stream this event belongs to
    pub team: TeamSide,
    /// Seconds elapsed within the current quarter
    #[serde(default)]
    pub event_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrower_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrower_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_y: Option<f64>,
    /// Pull hang time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_ms: Option<u32>,
    /// Player ids on the field, present on start-of-point rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<String>>,
}

impl GameEvent {
    /// Creates an event with no players or coordinates.
    pub fn new(event_type: EventKind, team: TeamSide, event_time: u32) -> Self {
        Self {
            event_type,
            team,
            event_time,
            thrower: None,
            receiver: None,
            defender: None,
            puller: None,
            thrower_x: None,
            thrower_y: None,
            receiver_x: None,
            receiver_y: None,
            turnover_x: None,
            turnover_y: None,
            pull_x: None,
            pull_y: None,
            pull_ms: None,
            line: None,
        }
    }

    pub fn thrower_position(&self) -> Option<FieldPoint> {
        FieldPoint::from_parts(self.thrower_x, self.thrower_y)
    }

    pub fn receiver_position(&self) -> Option<FieldPoint> {
        FieldPoint::from_parts(self.receiver_x, self.receiver_y)
    }

    pub fn turnover_position(&self) -> Option<FieldPoint> {
        FieldPoint::from_parts(self.turnover_x, self.turnover_y)
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Builder for creating events with a fluent API.
///
/// # Example
///
/// ```
/// use ulti_events::*;
///
/// let event = GameEventBuilder::new(EventKind::Pass, TeamSide::Home)
///     .time(42)
///     .thrower("jlee", 0.0, 40.0)
///     .receiver("mcho", 15.0, 40.0)
///     .build();
/// assert_eq!(event.thrower_position(), Some(FieldPoint::new(0.0, 40.0)));
/// ```
#[derive(Debug, Clone)]
pub struct GameEventBuilder {
    event: GameEvent,
}

impl GameEventBuilder {
    pub fn new(event_type: EventKind, team: TeamSide) -> Self {
        Self {
            event: GameEvent::new(event_type, team, 0),
        }
    }

    /// Sets the seconds elapsed in the quarter.
    pub fn time(mut self, event_time: u32) -> Self {
        self.event.event_time = event_time;
        self
    }

    /// Sets the thrower and their position.
    pub fn thrower(mut self, id: impl Into<String>, x: f64, y: f64) -> Self {
        self.event.thrower = Some(id.into());
        self.event.thrower_x = Some(x);
        self.event.thrower_y = Some(y);
        self
    }

    /// Sets the thrower without a position.
    pub fn thrower_id(mut self, id: impl Into<String>) -> Self {
        self.event.thrower = Some(id.into());
        self
    }

    /// Sets the receiver and their position.
    pub fn receiver(mut self, id: impl Into<String>, x: f64, y: f64) -> Self {
        self.event.receiver = Some(id.into());
        self.event.receiver_x = Some(x);
        self.event.receiver_y = Some(y);
        self
    }

    /// Sets the receiver without a position.
    pub fn receiver_id(mut self, id: impl Into<String>) -> Self {
        self.event.receiver = Some(id.into());
        self
    }

    pub fn defender(mut self, id: impl Into<String>) -> Self {
        self.event.defender = Some(id.into());
        self
    }

    pub fn turnover_at(mut self, x: f64, y: f64) -> Self {
        self.event.turnover_x = Some(x);
        self.event.turnover_y = Some(y);
        self
    }

    /// Sets the puller and where the pull landed.
    pub fn pull(mut self, id: impl Into<String>, x: f64, y: f64) -> Self {
        self.event.puller = Some(id.into());
        self.event.pull_x = Some(x);
        self.event.pull_y = Some(y);
        self
    }

    pub fn pull_ms(mut self, ms: u32) -> Self {
        self.event.pull_ms = Some(ms);
        self
    }

    /// Sets the roster snapshot for a start-of-point row.
    pub fn line<I, S>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event.line = Some(players.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> GameEvent {
        self.event
    }
}

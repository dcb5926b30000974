//! Point segmentation.
//!
//! Splits one team's event stream into points. This is the only place point
//! boundaries are decided; the play-by-play reconstructor and the possession
//! aggregator both walk its output, so they always agree on where a point
//! starts and ends.
//!
//! The segmenter is a small state machine folded over the stream:
//!
//! ```text
//!              start-of-point                 start-of-point / period end
//!  NoActivePoint ─────────────▶ ActivePoint ─────────────────────────────▶ (emit)
//!        │  live play event          ▲
//!        └───────────────────────────┘  (synthesized, no opener)
//! ```
//!
//! A point holds at most one score. Live play after the score with no
//! start row in between closes the point and synthesizes the next one.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use ulti_events::{EventKind, GameClock, GameEvent, TeamSide};

/// Which unit started the point, from the observing team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Received the pull
    OLine,
    /// Threw the pull
    DLine,
}

/// Metadata carried by a start-of-point row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOpener {
    pub pulling_team: TeamSide,
    pub receiving_team: TeamSide,
    pub line_type: LineType,
    /// Player ids on the field for the observing team
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
}

impl PointOpener {
    /// Derives pulling/receiving teams and line type for a start row.
    ///
    /// Returns `None` for any other event kind.
    pub fn from_start(observer: TeamSide, event: &GameEvent) -> Option<Self> {
        let (pulling_team, receiving_team, line_type) = match (observer, event.event_type) {
            (TeamSide::Home, EventKind::StartOPoint) => (TeamSide::Away, TeamSide::Home, LineType::OLine),
            (TeamSide::Home, EventKind::StartDPoint) => (TeamSide::Home, TeamSide::Away, LineType::DLine),
            (TeamSide::Away, EventKind::StartOPoint) => (TeamSide::Home, TeamSide::Away, LineType::OLine),
            (TeamSide::Away, EventKind::StartDPoint) => (TeamSide::Away, TeamSide::Home, LineType::DLine),
            _ => return None,
        };
        Some(Self {
            pulling_team,
            receiving_team,
            line_type,
            line: event.line.clone().unwrap_or_default(),
        })
    }
}

/// Why a point was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointClose {
    /// The next start-of-point row
    NextPoint,
    /// A quarter, half, regulation or overtime marker
    PeriodEnd,
    /// The log ran out; duration is the fallback
    EndOfLog,
    /// Play continued after the point was already scored
    AfterScore,
}

/// Boundaries of one point as indices into the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBounds {
    pub point_number: u32,
    pub quarter: u8,
    /// Absolute time the point's period began; body event times are relative to it
    pub clock_offset: u32,
    /// `None` when the point was synthesized from a stray play event
    pub opener: Option<PointOpener>,
    pub start_time: u32,
    pub end_time: u32,
    pub closed_by: PointClose,
    /// Events inside the point, excluding the start row and the closer
    pub body: Range<usize>,
}

impl SegmentBounds {
    /// Point length in seconds, floored at zero.
    pub fn duration(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// A point with its body resolved against the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSegment<'a> {
    pub bounds: SegmentBounds,
    pub events: &'a [GameEvent],
}

#[derive(Debug, Clone)]
struct OpenPoint {
    point_number: u32,
    quarter: u8,
    clock_offset: u32,
    opener: Option<PointOpener>,
    start_time: u32,
    body_start: usize,
    scored: bool,
}

/// Running segmentation state for one observing team.
#[derive(Debug, Clone)]
pub struct PointSegmenter {
    observer: TeamSide,
    clock: GameClock,
    fallback_secs: u32,
    points_opened: u32,
    open: Option<OpenPoint>,
}

impl PointSegmenter {
    pub fn new(observer: TeamSide, fallback_secs: u32) -> Self {
        Self {
            observer,
            clock: GameClock::start(),
            fallback_secs,
            points_opened: 0,
            open: None,
        }
    }

    pub fn clock(&self) -> GameClock {
        self.clock
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feeds the event at `index`, returning the point it closed, if any.
    pub fn step(&mut self, index: usize, event: &GameEvent) -> Option<SegmentBounds> {
        let kind = event.event_type;

        if kind.is_point_start() {
            let now = self.clock.absolute(event.event_time);
            let closed = self.close(index, now, PointClose::NextPoint);
            self.open_point(PointOpener::from_start(self.observer, event), now, index + 1);
            return closed;
        }

        if kind.is_period_end() {
            let end = kind
                .period_boundary()
                .unwrap_or_else(|| self.clock.absolute(event.event_time));
            let closed = self.close(index, end, PointClose::PeriodEnd);
            tracing::debug!(
                quarter = self.clock.quarter,
                overtime = self.clock.in_overtime(),
                end,
                "period ended"
            );
            self.clock.end_period(end);
            return closed;
        }

        if !kind.is_live_play() {
            return None;
        }

        let now = self.clock.absolute(event.event_time);
        let already_scored = self.open.as_ref().is_some_and(|open| open.scored);
        let closed = if already_scored {
            self.close(index, now, PointClose::AfterScore)
        } else {
            None
        };

        if self.open.is_none() {
            tracing::debug!(
                team = %self.observer,
                code = kind.code(),
                time = now,
                "play event outside a point, synthesizing one"
            );
            self.open_point(None, now, index);
        }

        if kind.is_recording_score() || kind.is_opposing_score() {
            if let Some(open) = self.open.as_mut() {
                open.scored = true;
            }
        }

        closed
    }

    /// Closes whatever is still open once the stream has `len` events.
    pub fn finish(mut self, len: usize) -> Option<SegmentBounds> {
        let start_time = self.open.as_ref()?.start_time;
        let end_time = start_time.saturating_add(self.fallback_secs);
        self.close(len, end_time, PointClose::EndOfLog)
    }

    fn open_point(&mut self, opener: Option<PointOpener>, start_time: u32, body_start: usize) {
        self.points_opened += 1;
        self.open = Some(OpenPoint {
            point_number: self.points_opened,
            quarter: self.clock.quarter,
            clock_offset: self.clock.offset,
            opener,
            start_time,
            body_start,
            scored: false,
        });
    }

    fn close(&mut self, body_end: usize, end_time: u32, closed_by: PointClose) -> Option<SegmentBounds> {
        let open = self.open.take()?;
        Some(SegmentBounds {
            point_number: open.point_number,
            quarter: open.quarter,
            clock_offset: open.clock_offset,
            opener: open.opener,
            start_time: open.start_time,
            end_time,
            closed_by,
            body: open.body_start..body_end.max(open.body_start),
        })
    }
}

/// Splits a team's stream into points.
pub fn segment_points(
    observer: TeamSide,
    events: &[GameEvent],
    fallback_secs: u32,
) -> Vec<PointSegment<'_>> {
    let mut segmenter = PointSegmenter::new(observer, fallback_secs);
    let mut bounds = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if let Some(closed) = segmenter.step(index, event) {
            bounds.push(closed);
        }
    }
    if let Some(closed) = segmenter.finish(events.len()) {
        bounds.push(closed);
    }

    bounds
        .into_iter()
        .map(|b| PointSegment {
            events: &events[b.body.clone()],
            bounds: b,
        })
        .collect()
}

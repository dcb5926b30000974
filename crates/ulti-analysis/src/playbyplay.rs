//! Play-by-play reconstruction.
//!
//! Turns one team's event stream into a list of [`Point`]s, each carrying the
//! narrative [`PlayEvent`]s that happened in it. Home and away streams are
//! reconstructed independently and concatenated, so every point keeps its own
//! team's line and player names.

use serde::{Deserialize, Serialize};
use ulti_events::{
    clock_remaining, format_duration, EventKind, GameEvent, GameLog, NameLookup, TeamSide,
};

use crate::classifier::{PassClassifier, PassType, ThrowGeometry};
use crate::config::{AnalysisConfig, FieldConfig};
use crate::segment::{segment_points, LineType, PointSegment};

/// Kind of a narrative play event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayEventKind {
    Pull,
    Pass,
    Goal,
    Block,
    Throwaway,
    Drop,
    Stall,
    OpponentTurnover,
    OpponentScore,
}

/// One line of play-by-play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    #[serde(rename = "type")]
    pub kind: PlayEventKind,
    pub description: String,
    /// Absolute game seconds
    pub time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yard_line: Option<i32>,
    /// Throw direction in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    /// Throw or pull distance in yards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_type: Option<PassType>,
    /// Set on goals scored by a defender catching the opponent's throw
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub callahan: bool,
}

impl PlayEvent {
    pub fn new(kind: PlayEventKind, description: impl Into<String>, time: u32) -> Self {
        Self {
            kind,
            description: description.into(),
            time,
            yard_line: None,
            direction: None,
            distance: None,
            pass_type: None,
            callahan: false,
        }
    }

    fn with_yard_line(mut self, y: Option<f64>) -> Self {
        self.yard_line = y.map(|y| y as i32);
        self
    }

    fn with_geometry(mut self, geometry: Option<ThrowGeometry>) -> Self {
        if let Some(g) = geometry {
            self.distance = Some(g.distance_yards());
            self.direction = Some(g.direction_degrees());
        }
        self
    }

    fn with_pass_type(mut self, pass_type: Option<PassType>) -> Self {
        self.pass_type = pass_type;
        self
    }
}

/// Score at a moment in the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub fn credit(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home += 1,
            TeamSide::Away => self.away += 1,
        }
    }
}

/// A reconstructed point, from one team's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Team whose stream this point was rebuilt from
    pub team: TeamSide,
    pub point_number: u32,
    pub quarter: u8,
    pub pulling_team: Option<TeamSide>,
    pub receiving_team: Option<TeamSide>,
    pub line_type: Option<LineType>,
    /// Display names of the observing team's line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    pub start_time: u32,
    pub end_time: u32,
    pub duration: u32,
    pub duration_display: String,
    pub clock_remaining: String,
    pub scoring_team: Option<TeamSide>,
    pub events: Vec<PlayEvent>,
    pub home_score: u32,
    pub away_score: u32,
}

impl Point {
    fn stamp(&mut self, score: Scoreline) {
        self.home_score = score.home;
        self.away_score = score.away;
    }

    /// Final score from this team's point of view: (own, opponent).
    pub fn team_score(&self) -> (u32, u32) {
        match self.team {
            TeamSide::Home => (self.home_score, self.away_score),
            TeamSide::Away => (self.away_score, self.home_score),
        }
    }
}

/// Throw label used in pass, goal and throwaway text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThrowLabel {
    Dump,
    Huck,
    Pass,
}

/// Rebuilds play-by-play for one observing team.
pub struct PlayByPlayReconstructor<'n> {
    observer: TeamSide,
    classifier: PassClassifier,
    field: FieldConfig,
    fallback_secs: u32,
    names: &'n dyn NameLookup,
}

impl<'n> PlayByPlayReconstructor<'n> {
    pub fn new(observer: TeamSide, config: &AnalysisConfig, names: &'n dyn NameLookup) -> Self {
        Self {
            observer,
            classifier: PassClassifier::new(config.classifier.clone()),
            field: config.field.clone(),
            fallback_secs: config.points.fallback_duration_secs,
            names,
        }
    }

    /// Reconstructs every point in the stream, in order.
    pub fn reconstruct(&self, events: &[GameEvent]) -> Vec<Point> {
        let mut score = Scoreline::default();
        segment_points(self.observer, events, self.fallback_secs)
            .iter()
            .map(|segment| self.build_point(segment, &mut score))
            .collect()
    }

    fn build_point(&self, segment: &PointSegment<'_>, score: &mut Scoreline) -> Point {
        let bounds = &segment.bounds;
        let opener = bounds.opener.as_ref();
        let duration = bounds.duration();

        let mut point = Point {
            team: self.observer,
            point_number: bounds.point_number,
            quarter: bounds.quarter,
            pulling_team: opener.map(|o| o.pulling_team),
            receiving_team: opener.map(|o| o.receiving_team),
            line_type: opener.map(|o| o.line_type),
            line: opener
                .map(|o| {
                    o.line
                        .iter()
                        .filter_map(|id| self.names.display_name(id).map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            start_time: bounds.start_time,
            end_time: bounds.end_time,
            duration,
            duration_display: format_duration(duration),
            clock_remaining: clock_remaining(bounds.end_time),
            scoring_team: None,
            events: Vec::new(),
            home_score: score.home,
            away_score: score.away,
        };

        if opener.is_some() {
            point
                .events
                .push(PlayEvent::new(PlayEventKind::Pull, "Pull", bounds.start_time));
        }

        for event in segment.events {
            self.apply(event, bounds.clock_offset, &mut point, score);
        }

        point.stamp(*score);
        point
    }

    /// Dispatches a single body event.
    fn apply(&self, event: &GameEvent, offset: u32, point: &mut Point, score: &mut Scoreline) {
        let time = offset.saturating_add(event.event_time);
        match event.event_type {
            EventKind::PullInbounds | EventKind::PullOutOfBounds => {
                if point.pulling_team == Some(self.observer) {
                    let pull = self.describe_pull(event, time);
                    match point.events.iter().rposition(|e| e.kind == PlayEventKind::Pull) {
                        Some(index) => point.events[index] = pull,
                        None => point.events.push(pull),
                    }
                }
            }
            EventKind::Pass => {
                let geometry =
                    ThrowGeometry::from_parts(event.thrower_position(), event.receiver_position());
                let label = self.throw_label(geometry);
                let text = self.throw_text(label_text(label), event);
                point.events.push(
                    PlayEvent::new(PlayEventKind::Pass, text, time)
                        .with_geometry(geometry)
                        .with_yard_line(event.receiver_y)
                        .with_pass_type(self.classifier.classify_event(event)),
                );
            }
            EventKind::Score => {
                score.credit(self.observer);
                point.scoring_team = Some(self.observer);
                point.stamp(*score);
                let geometry =
                    ThrowGeometry::from_parts(event.thrower_position(), event.receiver_position());
                let label = if self.throw_label(geometry) == ThrowLabel::Huck {
                    "Huck goal"
                } else {
                    "Goal"
                };
                point.events.push(
                    PlayEvent::new(PlayEventKind::Goal, self.throw_text(label, event), time)
                        .with_geometry(geometry)
                        .with_yard_line(event.receiver_y)
                        .with_pass_type(self.classifier.classify_event(event)),
                );
            }
            EventKind::CallahanCaught => {
                score.credit(self.observer);
                point.scoring_team = Some(self.observer);
                point.stamp(*score);
                let text = self.with_name("Callahan", "by", event.defender.as_deref());
                let mut goal =
                    PlayEvent::new(PlayEventKind::Goal, text, time).with_yard_line(event.turnover_y);
                goal.callahan = true;
                point.events.push(goal);
            }
            EventKind::ScoreByOpposing | EventKind::CallahanThrown => {
                let opponent = self.observer.opponent();
                score.credit(opponent);
                point.scoring_team = Some(opponent);
                point.stamp(*score);
                let text = if event.event_type == EventKind::CallahanThrown {
                    self.with_name("Opponent Callahan", "off a throw by", event.thrower.as_deref())
                } else {
                    "Opponent scored".to_string()
                };
                point
                    .events
                    .push(PlayEvent::new(PlayEventKind::OpponentScore, text, time));
            }
            EventKind::Block => {
                let text = self.with_name("Block", "by", event.defender.as_deref());
                point.events.push(
                    PlayEvent::new(PlayEventKind::Block, text, time).with_yard_line(event.turnover_y),
                );
            }
            EventKind::BlockByOpposing => {
                let text = self.with_name("Blocked", "by", event.defender.as_deref());
                point.events.push(
                    PlayEvent::new(PlayEventKind::OpponentTurnover, text, time)
                        .with_yard_line(event.turnover_y),
                );
            }
            EventKind::Throwaway => {
                let geometry =
                    ThrowGeometry::from_parts(event.thrower_position(), event.turnover_position());
                let label = if self.throw_label(geometry) == ThrowLabel::Huck {
                    "Huck throwaway"
                } else {
                    "Throwaway"
                };
                let text = self.with_name(label, "by", event.thrower.as_deref());
                point.events.push(
                    PlayEvent::new(PlayEventKind::Throwaway, text, time)
                        .with_geometry(geometry)
                        .with_yard_line(event.turnover_y),
                );
            }
            EventKind::Drop => {
                let geometry =
                    ThrowGeometry::from_parts(event.thrower_position(), event.receiver_position());
                let text = self.with_name("Drop", "by", event.receiver.as_deref());
                point.events.push(
                    PlayEvent::new(PlayEventKind::Drop, text, time)
                        .with_geometry(geometry)
                        .with_yard_line(event.receiver_y.or(event.turnover_y))
                        .with_pass_type(self.classifier.classify_event(event)),
                );
            }
            EventKind::Stall => {
                point.events.push(
                    PlayEvent::new(PlayEventKind::Stall, "Stall", time)
                        .with_yard_line(event.turnover_y),
                );
            }
            EventKind::ThrowawayByOpposing => {
                point.events.push(
                    PlayEvent::new(PlayEventKind::OpponentTurnover, "Opponent throwaway", time)
                        .with_yard_line(event.turnover_y),
                );
            }
            EventKind::StallAgainstOpposing => {
                point.events.push(
                    PlayEvent::new(PlayEventKind::OpponentTurnover, "Opponent stall", time)
                        .with_yard_line(event.turnover_y),
                );
            }
            EventKind::StartDPoint
            | EventKind::StartOPoint
            | EventKind::TimeoutRecording
            | EventKind::TimeoutOpposing
            | EventKind::BetweenPointTimeoutRecording
            | EventKind::BetweenPointTimeoutOpposing
            | EventKind::OffsidesRecording
            | EventKind::OffsidesOpposing
            | EventKind::PenaltyOnRecording
            | EventKind::PenaltyOnOpposing
            | EventKind::Injury
            | EventKind::EndOfFirstQuarter
            | EventKind::Halftime
            | EventKind::EndOfThirdQuarter
            | EventKind::EndOfRegulation
            | EventKind::EndOfOvertime => {}
            EventKind::Unrecognized(code) => {
                tracing::trace!(code, team = %self.observer, "skipping unrecognized event");
            }
        }
    }

    fn describe_pull(&self, event: &GameEvent, time: u32) -> PlayEvent {
        let label = if event.event_type == EventKind::PullOutOfBounds {
            "Out-of-bounds pull"
        } else {
            "Pull"
        };
        let mut text = self.with_name(label, "by", event.puller.as_deref());
        let distance = event
            .pull_y
            .map(|y| (y - self.field.pull_line_y).abs().round() as i32);

        let mut details = Vec::new();
        if let Some(d) = distance {
            details.push(format!("{} yards", d));
        }
        if let Some(ms) = event.pull_ms {
            details.push(format!("{:.1}s hang", f64::from(ms) / 1000.0));
        }
        if !details.is_empty() {
            text = format!("{} ({})", text, details.join(", "));
        }

        let mut pull = PlayEvent::new(PlayEventKind::Pull, text, time).with_yard_line(event.pull_y);
        pull.distance = distance;
        pull
    }

    fn throw_label(&self, geometry: Option<ThrowGeometry>) -> ThrowLabel {
        match geometry {
            Some(g) if g.vertical <= 0.0 => ThrowLabel::Dump,
            Some(g) if g.vertical >= self.classifier.config().huck_min_vertical => ThrowLabel::Huck,
            _ => ThrowLabel::Pass,
        }
    }

    /// "Label from A to B", dropping whichever name is unknown.
    fn throw_text(&self, label: &str, event: &GameEvent) -> String {
        let thrower = self.names.resolve(event.thrower.as_deref());
        let receiver = self.names.resolve(event.receiver.as_deref());
        match (thrower, receiver) {
            (Some(t), Some(r)) => format!("{} from {} to {}", label, t, r),
            (Some(t), None) => format!("{} from {}", label, t),
            (None, Some(r)) => format!("{} to {}", label, r),
            (None, None) => label.to_string(),
        }
    }

    fn with_name(&self, label: &str, joiner: &str, player: Option<&str>) -> String {
        match self.names.resolve(player) {
            Some(name) => format!("{} {} {}", label, joiner, name),
            None => label.to_string(),
        }
    }
}

fn label_text(label: ThrowLabel) -> &'static str {
    match label {
        ThrowLabel::Dump => "Dump",
        ThrowLabel::Huck => "Huck",
        ThrowLabel::Pass => "Pass",
    }
}

/// Reconstructs both teams and concatenates home points then away points.
pub fn reconstruct_game(log: &GameLog, config: &AnalysisConfig, names: &dyn NameLookup) -> Vec<Point> {
    TeamSide::both()
        .into_iter()
        .flat_map(|side| {
            PlayByPlayReconstructor::new(side, config, names).reconstruct(log.events_for(side))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulti_events::{GameEventBuilder, GameMetadata, NoNames, PlayerDirectory};

    fn home(kind: EventKind) -> GameEventBuilder {
        GameEventBuilder::new(kind, TeamSide::Home)
    }

    fn rebuild(events: &[GameEvent], names: &dyn NameLookup) -> Vec<Point> {
        PlayByPlayReconstructor::new(TeamSide::Home, &AnalysisConfig::default(), names)
            .reconstruct(events)
    }

    #[test]
    fn test_huck_then_goal() {
        let events = vec![
            home(EventKind::StartOPoint).time(0).build(),
            home(EventKind::Pass)
                .time(10)
                .thrower("a", 25.0, 40.0)
                .receiver("b", 25.0, 80.0)
                .build(),
            home(EventKind::Score)
                .time(30)
                .thrower("b", 25.0, 80.0)
                .receiver("c", 25.0, 105.0)
                .build(),
        ];
        let points = rebuild(&events, &NoNames);
        assert_eq!(points.len(), 1);

        let point = &points[0];
        assert_eq!(point.home_score, 1);
        assert_eq!(point.away_score, 0);
        assert_eq!(point.scoring_team, Some(TeamSide::Home));
        assert_eq!(point.receiving_team, Some(TeamSide::Home));
        assert_eq!(point.line_type, Some(LineType::OLine));

        let kinds: Vec<_> = point.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![PlayEventKind::Pull, PlayEventKind::Pass, PlayEventKind::Goal]
        );

        let pass = &point.events[1];
        assert_eq!(pass.description, "Huck");
        assert_eq!(pass.pass_type, Some(PassType::Huck));
        assert_eq!(pass.distance, Some(40));
        assert_eq!(pass.yard_line, Some(80));
        assert!((pass.direction.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(pass.time, 10);

        assert_eq!(point.events[2].description, "Goal");
        assert_eq!(point.events[2].time, 30);

        // no end marker: fallback duration
        assert_eq!(point.end_time, 90);
        assert_eq!(point.duration_display, "1m30s");
        assert_eq!(point.clock_remaining, "10:30");
    }

    #[test]
    fn test_quarter_end_closes_scoring_point() {
        let events = vec![
            home(EventKind::StartOPoint).time(0).build(),
            home(EventKind::Score).time(45).build(),
            home(EventKind::EndOfFirstQuarter).time(720).build(),
        ];
        let points = rebuild(&events, &NoNames);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].end_time, 720);
        assert_eq!(points[0].duration, 720);
        assert_eq!(points[0].quarter, 1);
        assert_eq!(points[0].clock_remaining, "12:00");
        assert_eq!(points[0].duration_display, "12m0s");
    }

    #[test]
    fn test_detailed_pull_replaces_generic() {
        let names = PlayerDirectory::new(2024).with_player("p", "Pat Puller");
        let events = vec![
            home(EventKind::StartDPoint).time(0).build(),
            home(EventKind::PullInbounds)
                .time(4)
                .pull("p", 10.0, 70.0)
                .pull_ms(4200)
                .build(),
            home(EventKind::ScoreByOpposing).time(60).build(),
        ];
        let point = &rebuild(&events, &names)[0];

        assert_eq!(point.events.len(), 2);
        assert_eq!(point.events[0].description, "Pull by Pat Puller (50 yards, 4.2s hang)");
        assert_eq!(point.events[0].distance, Some(50));
        assert_eq!(point.events[1].kind, PlayEventKind::OpponentScore);
        assert_eq!(point.scoring_team, Some(TeamSide::Away));
        assert_eq!(point.team_score(), (0, 1));
    }

    #[test]
    fn test_receiving_team_ignores_pull_detail() {
        let events = vec![
            home(EventKind::StartOPoint).time(0).build(),
            home(EventKind::PullInbounds).pull("p", 10.0, 70.0).build(),
        ];
        let point = &rebuild(&events, &NoNames)[0];
        assert_eq!(point.events.len(), 1);
        assert_eq!(point.events[0].description, "Pull");
    }

    #[test]
    fn test_missing_names_and_coordinates_degrade() {
        let names = PlayerDirectory::new(2024).with_player("a", "Ana");
        let events = vec![
            home(EventKind::StartOPoint).build(),
            home(EventKind::Pass).time(5).thrower_id("a").receiver_id("ghost").build(),
            home(EventKind::Throwaway)
                .time(9)
                .thrower("ghost", 0.0, 30.0)
                .turnover_at(0.0, 75.0)
                .build(),
            home(EventKind::Block).time(20).defender("a").turnover_at(5.0, 42.7).build(),
        ];
        let point = &rebuild(&events, &names)[0];

        let pass = &point.events[1];
        assert_eq!(pass.description, "Pass from Ana");
        assert!(pass.distance.is_none());
        assert!(pass.direction.is_none());
        assert!(pass.pass_type.is_none());

        let throwaway = &point.events[2];
        assert_eq!(throwaway.description, "Huck throwaway");
        assert_eq!(throwaway.distance, Some(45));
        assert_eq!(throwaway.yard_line, Some(75));

        assert_eq!(point.events[3].description, "Block by Ana");
        assert_eq!(point.events[3].yard_line, Some(42));
    }

    #[test]
    fn test_unrecognized_and_stoppages_are_skipped() {
        let events = vec![
            home(EventKind::StartOPoint).build(),
            home(EventKind::Unrecognized(26)).time(3).build(),
            home(EventKind::TimeoutRecording).time(4).build(),
            home(EventKind::Stall).time(8).turnover_at(20.0, 55.0).build(),
        ];
        let point = &rebuild(&events, &NoNames)[0];
        let kinds: Vec<_> = point.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![PlayEventKind::Pull, PlayEventKind::Stall]);
        assert_eq!(point.events[1].yard_line, Some(55));
    }

    #[test]
    fn test_stall_ignores_thrower_position() {
        let events = vec![
            home(EventKind::StartOPoint).build(),
            home(EventKind::Stall).time(8).thrower("a", 20.0, 55.0).build(),
        ];
        let point = &rebuild(&events, &NoNames)[0];
        assert_eq!(point.events[1].description, "Stall");
        assert!(point.events[1].yard_line.is_none());
    }

    #[test]
    fn test_callahan_goal_is_flagged() {
        let names = PlayerDirectory::new(2024).with_player("d", "Dee");
        let events = vec![
            home(EventKind::StartDPoint).build(),
            home(EventKind::CallahanCaught).time(12).defender("d").turnover_at(3.0, 104.0).build(),
        ];
        let point = &rebuild(&events, &names)[0];
        let goal = &point.events[1];
        assert_eq!(goal.kind, PlayEventKind::Goal);
        assert_eq!(goal.description, "Callahan by Dee");
        assert!(goal.callahan);
        assert_eq!(point.home_score, 1);

        let json = serde_json::to_value(goal).unwrap();
        assert_eq!(json["callahan"], true);
        let pull = serde_json::to_value(&point.events[0]).unwrap();
        assert!(pull.get("callahan").is_none());
    }

    #[test]
    fn test_synthesized_point_has_no_opener() {
        let events = vec![home(EventKind::Score).time(50).build()];
        let points = rebuild(&events, &NoNames);
        assert_eq!(points.len(), 1);

        let point = &points[0];
        assert!(point.pulling_team.is_none());
        assert!(point.line_type.is_none());
        assert_eq!(point.start_time, 50);
        assert_eq!(point.events.len(), 1);
        assert_eq!(point.events[0].kind, PlayEventKind::Goal);
        assert_eq!(point.home_score, 1);
    }

    #[test]
    fn test_running_score_carries_between_points() {
        let events = vec![
            home(EventKind::StartOPoint).time(0).build(),
            home(EventKind::Score).time(40).build(),
            home(EventKind::StartDPoint).time(100).build(),
            home(EventKind::ScoreByOpposing).time(160).build(),
            home(EventKind::StartOPoint).time(220).build(),
        ];
        let points = rebuild(&events, &NoNames);
        assert_eq!(points.len(), 3);
        assert_eq!((points[0].home_score, points[0].away_score), (1, 0));
        assert_eq!((points[1].home_score, points[1].away_score), (1, 1));
        assert_eq!((points[2].home_score, points[2].away_score), (1, 1));
        assert_eq!(points[2].scoring_team, None);
    }

    #[test]
    fn test_reconstruct_game_concatenates() {
        let log = GameLog::new(
            GameMetadata::new("g", "h", "a", 2024),
            vec![
                home(EventKind::StartOPoint).build(),
                home(EventKind::Score).time(30).build(),
            ],
            vec![
                GameEventBuilder::new(EventKind::StartDPoint, TeamSide::Away).build(),
                GameEventBuilder::new(EventKind::ScoreByOpposing, TeamSide::Away)
                    .time(30)
                    .build(),
            ],
        );
        let points = reconstruct_game(&log, &AnalysisConfig::default(), &NoNames);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].team, TeamSide::Home);
        assert_eq!(points[1].team, TeamSide::Away);
        assert_eq!(points[1].pulling_team, Some(TeamSide::Away));
        assert_eq!(points[1].home_score, 1);
    }
}

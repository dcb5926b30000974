//! Possession counting per line, plus red-zone and pass-mix tallies.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use ulti_events::{EventKind, GameEvent, TeamSide};

use crate::classifier::{PassClassifier, PassType};
use crate::config::{AnalysisConfig, FieldConfig};
use crate::segment::{segment_points, LineType, PointSegment};

/// Raw possession counts for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionTally {
    pub o_line_points: u32,
    pub o_line_scores: u32,
    pub o_line_possessions: u32,
    pub d_line_points: u32,
    pub d_line_scores: u32,
    pub d_line_possessions: u32,
    pub redzone_possessions: u32,
    pub redzone_goals: u32,
}

impl PossessionTally {
    pub fn total_points(&self) -> u32 {
        self.o_line_points + self.d_line_points
    }

    pub fn total_scores(&self) -> u32 {
        self.o_line_scores + self.d_line_scores
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: &PossessionTally) {
        self.o_line_points += other.o_line_points;
        self.o_line_scores += other.o_line_scores;
        self.o_line_possessions += other.o_line_possessions;
        self.d_line_points += other.d_line_points;
        self.d_line_scores += other.d_line_scores;
        self.d_line_possessions += other.d_line_possessions;
        self.redzone_possessions += other.redzone_possessions;
        self.redzone_goals += other.redzone_goals;
    }

    /// Scores never exceed points, points never exceed possessions, and
    /// red-zone goals never exceed red-zone possessions.
    pub fn is_consistent(&self) -> bool {
        self.o_line_scores <= self.o_line_points
            && self.o_line_points <= self.o_line_possessions
            && self.d_line_scores <= self.d_line_points
            && self.d_line_points <= self.d_line_possessions
            && self.redzone_goals <= self.redzone_possessions
    }
}

impl AddAssign for PossessionTally {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Completed throws (passes and goals) by classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassMix {
    pub huck: u32,
    pub swing: u32,
    pub gainer: u32,
    pub dump: u32,
    pub dish: u32,
}

impl PassMix {
    pub fn record(&mut self, pass_type: PassType) {
        match pass_type {
            PassType::Huck => self.huck += 1,
            PassType::Swing => self.swing += 1,
            PassType::Gainer => self.gainer += 1,
            PassType::Dump => self.dump += 1,
            PassType::Dish => self.dish += 1,
        }
    }

    pub fn count(&self, pass_type: PassType) -> u32 {
        match pass_type {
            PassType::Huck => self.huck,
            PassType::Swing => self.swing,
            PassType::Gainer => self.gainer,
            PassType::Dump => self.dump,
            PassType::Dish => self.dish,
        }
    }

    pub fn total(&self) -> u32 {
        PassType::all().iter().map(|&t| self.count(t)).sum()
    }
}

impl AddAssign for PassMix {
    fn add_assign(&mut self, rhs: Self) {
        self.huck += rhs.huck;
        self.swing += rhs.swing;
        self.gainer += rhs.gainer;
        self.dump += rhs.dump;
        self.dish += rhs.dish;
    }
}

/// Everything the aggregator counts for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionSummary {
    pub tally: PossessionTally,
    pub pass_mix: PassMix,
}

/// Effect of an event on who holds the disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turnover {
    ObserverLoses,
    ObserverGains,
    None,
}

fn turnover_effect(kind: EventKind) -> Turnover {
    match kind {
        EventKind::Throwaway
        | EventKind::Drop
        | EventKind::Stall
        | EventKind::BlockByOpposing
        | EventKind::CallahanThrown => Turnover::ObserverLoses,
        EventKind::Block
        | EventKind::ThrowawayByOpposing
        | EventKind::StallAgainstOpposing
        | EventKind::CallahanCaught => Turnover::ObserverGains,
        _ => Turnover::None,
    }
}

/// Per-point possession walk.
struct PointWalk<'f> {
    field: &'f FieldConfig,
    line_type: LineType,
    observer_holds: bool,
    redzone_flagged: bool,
    tally: PossessionTally,
}

impl<'f> PointWalk<'f> {
    fn new(field: &'f FieldConfig, line_type: LineType, observer_holds: bool) -> Self {
        let mut tally = PossessionTally::default();
        match line_type {
            LineType::OLine => {
                tally.o_line_points = 1;
                tally.o_line_possessions = 1;
            }
            LineType::DLine => {
                tally.d_line_points = 1;
                tally.d_line_possessions = 1;
            }
        }
        Self {
            field,
            line_type,
            observer_holds,
            redzone_flagged: false,
            tally,
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        let kind = event.event_type;

        if self.observer_holds {
            self.scan_redzone(event);
        }

        if kind.is_recording_score() {
            match self.line_type {
                LineType::OLine => self.tally.o_line_scores += 1,
                LineType::DLine => self.tally.d_line_scores += 1,
            }
            if kind == EventKind::Score && self.redzone_flagged {
                self.tally.redzone_goals += 1;
            }
            self.redzone_flagged = false;
            return;
        }

        // Callahans end the point, so they never open a new possession.
        let scoring = kind.is_opposing_score();
        match turnover_effect(kind) {
            Turnover::ObserverLoses if self.observer_holds => {
                self.observer_holds = false;
                if self.line_type == LineType::DLine && !scoring {
                    self.tally.d_line_possessions += 1;
                }
            }
            Turnover::ObserverGains if !self.observer_holds => {
                self.observer_holds = true;
                self.redzone_flagged = false;
                if self.line_type == LineType::OLine {
                    self.tally.o_line_possessions += 1;
                }
            }
            _ => {}
        }
    }

    fn scan_redzone(&mut self, event: &GameEvent) {
        if self.redzone_flagged {
            return;
        }
        let spots = match event.event_type {
            EventKind::Pass => [event.thrower_y, event.receiver_y],
            EventKind::Score | EventKind::Drop | EventKind::Throwaway => [event.thrower_y, None],
            EventKind::Stall => [event.turnover_y, None],
            _ => [None, None],
        };
        if spots.iter().flatten().any(|&y| self.field.in_redzone(y)) {
            self.redzone_flagged = true;
            self.tally.redzone_possessions += 1;
        }
    }
}

/// Counts possessions for one observing team.
pub struct PossessionAggregator {
    observer: TeamSide,
    classifier: PassClassifier,
    field: FieldConfig,
    fallback_secs: u32,
}

impl PossessionAggregator {
    pub fn new(observer: TeamSide, config: &AnalysisConfig) -> Self {
        Self {
            observer,
            classifier: PassClassifier::new(config.classifier.clone()),
            field: config.field.clone(),
            fallback_secs: config.points.fallback_duration_secs,
        }
    }

    /// Tallies a whole stream.
    pub fn aggregate(&self, events: &[GameEvent]) -> PossessionSummary {
        let mut summary = PossessionSummary::default();
        for segment in segment_points(self.observer, events, self.fallback_secs) {
            self.add_point(&segment, &mut summary);
        }
        summary
    }

    fn add_point(&self, segment: &PointSegment<'_>, summary: &mut PossessionSummary) {
        for event in segment.events {
            if matches!(event.event_type, EventKind::Pass | EventKind::Score) {
                if let Some(pass_type) = self.classifier.classify_event(event) {
                    summary.pass_mix.record(pass_type);
                }
            }
        }

        let Some(opener) = segment.bounds.opener.as_ref() else {
            return;
        };
        let mut walk = PointWalk::new(
            &self.field,
            opener.line_type,
            opener.receiving_team == self.observer,
        );
        for event in segment.events {
            walk.observe(event);
        }
        summary.tally += walk.tally;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulti_events::GameEventBuilder;

    fn ev(kind: EventKind, t: u32) -> GameEvent {
        GameEvent::new(kind, TeamSide::Home, t)
    }

    fn aggregate(events: &[GameEvent]) -> PossessionSummary {
        PossessionAggregator::new(TeamSide::Home, &AnalysisConfig::default()).aggregate(events)
    }

    #[test]
    fn test_clean_hold() {
        let events = vec![
            ev(EventKind::StartOPoint, 0),
            GameEventBuilder::new(EventKind::Pass, TeamSide::Home)
                .time(10)
                .thrower("h1", 0.0, 40.0)
                .receiver("h2", 0.0, 85.0)
                .build(),
            GameEventBuilder::new(EventKind::Score, TeamSide::Home)
                .time(20)
                .thrower("h2", 0.0, 85.0)
                .receiver("h3", 0.0, 105.0)
                .build(),
        ];
        let tally = aggregate(&events).tally;
        assert_eq!(tally.o_line_points, 1);
        assert_eq!(tally.o_line_scores, 1);
        assert_eq!(tally.o_line_possessions, 1);
        assert_eq!(tally.redzone_possessions, 1);
        assert_eq!(tally.redzone_goals, 1);
        assert!(tally.is_consistent());
    }

    #[test]
    fn test_o_point_with_turnovers() {
        let events = vec![
            ev(EventKind::StartOPoint, 0),
            ev(EventKind::Throwaway, 10),
            ev(EventKind::Block, 20),
            ev(EventKind::Drop, 30),
            ev(EventKind::ThrowawayByOpposing, 40),
            ev(EventKind::Score, 50),
        ];
        let tally = aggregate(&events).tally;
        assert_eq!(tally.o_line_points, 1);
        assert_eq!(tally.o_line_possessions, 3);
        assert_eq!(tally.o_line_scores, 1);
        assert_eq!(tally.d_line_points, 0);
    }

    #[test]
    fn test_d_point_counts_defensive_stands() {
        let events = vec![
            ev(EventKind::StartDPoint, 0),
            ev(EventKind::Block, 10),
            ev(EventKind::Throwaway, 20),
            ev(EventKind::ScoreByOpposing, 30),
        ];
        let tally = aggregate(&events).tally;
        assert_eq!(tally.d_line_points, 1);
        assert_eq!(tally.d_line_possessions, 2);
        assert_eq!(tally.d_line_scores, 0);
    }

    #[test]
    fn test_callahan_is_a_break() {
        let events = vec![
            ev(EventKind::StartDPoint, 0),
            ev(EventKind::CallahanCaught, 12),
        ];
        let tally = aggregate(&events).tally;
        assert_eq!(tally.d_line_scores, 1);
        assert_eq!(tally.d_line_possessions, 1);
        assert_eq!(tally.redzone_goals, 0);
    }

    #[test]
    fn test_callahan_thrown_does_not_add_stand() {
        let events = vec![
            ev(EventKind::StartDPoint, 0),
            ev(EventKind::Block, 10),
            ev(EventKind::CallahanThrown, 20),
        ];
        let tally = aggregate(&events).tally;
        assert_eq!(tally.d_line_possessions, 1);
        assert_eq!(tally.d_line_scores, 0);
    }

    #[test]
    fn test_redzone_resets_per_possession() {
        let events = vec![
            ev(EventKind::StartOPoint, 0),
            GameEventBuilder::new(EventKind::Throwaway, TeamSide::Home)
                .thrower("h1", 0.0, 90.0)
                .turnover_at(0.0, 110.0)
                .build(),
            ev(EventKind::ThrowawayByOpposing, 20),
            GameEventBuilder::new(EventKind::Score, TeamSide::Home)
                .thrower("h1", 0.0, 50.0)
                .receiver("h2", 0.0, 105.0)
                .build(),
        ];
        let tally = aggregate(&events).tally;
        // the goal came from a huck that never touched the red zone
        assert_eq!(tally.redzone_possessions, 1);
        assert_eq!(tally.redzone_goals, 0);
    }

    #[test]
    fn test_missing_start_row_between_goals() {
        let goal = |t| {
            GameEventBuilder::new(EventKind::Score, TeamSide::Home)
                .time(t)
                .thrower("h1", 0.0, 85.0)
                .receiver("h2", 0.0, 105.0)
                .build()
        };
        let events = vec![ev(EventKind::StartOPoint, 0), goal(30), goal(90)];

        let summary = aggregate(&events);
        let tally = summary.tally;
        assert_eq!(tally.o_line_points, 1);
        assert_eq!(tally.o_line_scores, 1);
        assert_eq!(tally.o_line_possessions, 1);
        assert_eq!(tally.redzone_possessions, 1);
        assert_eq!(tally.redzone_goals, 1);
        assert!(tally.is_consistent());
        // the second goal still counts as a completion
        assert_eq!(summary.pass_mix.total(), 2);
    }

    #[test]
    fn test_stall_spot_comes_from_turnover() {
        let stall = |builder: GameEventBuilder| {
            let events = vec![ev(EventKind::StartOPoint, 0), builder.time(30).build()];
            aggregate(&events).tally.redzone_possessions
        };
        let base = || GameEventBuilder::new(EventKind::Stall, TeamSide::Home);
        assert_eq!(stall(base().turnover_at(10.0, 90.0)), 1);
        assert_eq!(stall(base().thrower("h1", 10.0, 90.0)), 0);
    }

    #[test]
    fn test_synthesized_point_is_not_counted() {
        let events = vec![ev(EventKind::Score, 10)];
        let summary = aggregate(&events);
        assert_eq!(summary.tally, PossessionTally::default());
    }

    #[test]
    fn test_pass_mix() {
        let events = vec![
            ev(EventKind::StartOPoint, 0),
            GameEventBuilder::new(EventKind::Pass, TeamSide::Home)
                .thrower("h1", 0.0, 40.0)
                .receiver("h2", 15.0, 40.0)
                .build(),
            GameEventBuilder::new(EventKind::Pass, TeamSide::Home)
                .thrower("h2", 15.0, 40.0)
                .receiver_id("h3")
                .build(),
            GameEventBuilder::new(EventKind::Score, TeamSide::Home)
                .thrower("h3", 15.0, 40.0)
                .receiver("h4", 15.0, 100.0)
                .build(),
        ];
        let mix = aggregate(&events).pass_mix;
        assert_eq!(mix.swing, 1);
        assert_eq!(mix.huck, 1);
        assert_eq!(mix.total(), 2);
    }

    #[test]
    fn test_merge_tallies() {
        let mut a = PossessionTally {
            o_line_points: 2,
            o_line_scores: 1,
            o_line_possessions: 3,
            ..Default::default()
        };
        let b = PossessionTally {
            d_line_points: 1,
            d_line_possessions: 2,
            redzone_possessions: 1,
            ..Default::default()
        };
        a += b;
        assert_eq!(a.total_points(), 3);
        assert_eq!(a.d_line_possessions, 2);
        assert_eq!(a.redzone_possessions, 1);
        assert!(a.is_consistent());
    }

    #[test]
    fn test_inconsistent_tally_detected() {
        let tally = PossessionTally {
            o_line_points: 1,
            o_line_scores: 2,
            o_line_possessions: 2,
            ..Default::default()
        };
        assert!(!tally.is_consistent());
    }
}

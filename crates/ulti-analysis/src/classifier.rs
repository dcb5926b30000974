//! Throw classification by field geometry.
//!
//! A throw is described by the thrower's and receiver's positions. The
//! classifier buckets it into a [`PassType`]; [`ThrowGeometry`] carries the
//! raw measurements used for play-by-play text.

use serde::{Deserialize, Serialize};
use ulti_events::{FieldPoint, GameEvent};

use crate::config::ClassifierConfig;

/// Pass categories, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassType {
    Huck,
    Swing,
    Gainer,
    Dump,
    Dish,
}

impl PassType {
    pub fn all() -> &'static [PassType] {
        &[
            PassType::Huck,
            PassType::Swing,
            PassType::Gainer,
            PassType::Dump,
            PassType::Dish,
        ]
    }
}

/// Classifies a throw with the default thresholds.
///
/// Returns `None` if any coordinate is missing.
///
/// # Example
///
/// ```
/// use ulti_analysis::{classify_pass, PassType};
///
/// assert_eq!(classify_pass(Some(0.0), Some(40.0), Some(15.0), Some(40.0)), Some(PassType::Swing));
/// assert_eq!(classify_pass(Some(0.0), Some(40.0), None, Some(40.0)), None);
/// ```
pub fn classify_pass(
    thrower_x: Option<f64>,
    thrower_y: Option<f64>,
    receiver_x: Option<f64>,
    receiver_y: Option<f64>,
) -> Option<PassType> {
    PassClassifier::default().classify(thrower_x, thrower_y, receiver_x, receiver_y)
}

/// Throw classifier with configurable thresholds.
#[derive(Debug, Clone, Default)]
pub struct PassClassifier {
    config: ClassifierConfig,
}

impl PassClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies a throw from raw coordinates.
    pub fn classify(
        &self,
        thrower_x: Option<f64>,
        thrower_y: Option<f64>,
        receiver_x: Option<f64>,
        receiver_y: Option<f64>,
    ) -> Option<PassType> {
        let vertical = receiver_y? - thrower_y?;
        let horizontal = (receiver_x? - thrower_x?).abs();
        Some(self.bucket(vertical, horizontal))
    }

    /// Classifies the thrower-to-receiver leg of an event.
    pub fn classify_event(&self, event: &GameEvent) -> Option<PassType> {
        self.classify(
            event.thrower_x,
            event.thrower_y,
            event.receiver_x,
            event.receiver_y,
        )
    }

    /// Order of the checks is the tie-break.
    fn bucket(&self, vertical: f64, horizontal: f64) -> PassType {
        let c = &self.config;
        if vertical >= c.huck_min_vertical {
            PassType::Huck
        } else if horizontal >= c.swing_min_horizontal && horizontal > c.swing_ratio * vertical.abs() {
            PassType::Swing
        } else if vertical >= c.gainer_min_vertical {
            PassType::Gainer
        } else if vertical < -c.dump_max_loss {
            PassType::Dump
        } else {
            PassType::Dish
        }
    }
}

/// Measurements of a single throw, in yards and degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowGeometry {
    /// Downfield gain; negative for throws backwards
    pub vertical: f64,
    /// Signed sideways movement (receiver x minus thrower x)
    pub horizontal: f64,
    /// Straight-line distance
    pub distance: f64,
    /// atan2(vertical, -horizontal) in degrees
    pub direction: f64,
}

impl ThrowGeometry {
    pub fn between(from: FieldPoint, to: FieldPoint) -> Self {
        let vertical = to.y - from.y;
        let horizontal = to.x - from.x;
        Self {
            vertical,
            horizontal,
            distance: vertical.hypot(horizontal),
            direction: vertical.atan2(-horizontal).to_degrees(),
        }
    }

    /// Geometry for two optional positions; `None` if either is missing.
    pub fn from_parts(from: Option<FieldPoint>, to: Option<FieldPoint>) -> Option<Self> {
        Some(Self::between(from?, to?))
    }

    /// Distance rounded to whole yards.
    pub fn distance_yards(&self) -> i32 {
        self.distance.round() as i32
    }

    /// Direction rounded to one decimal place.
    pub fn direction_degrees(&self) -> f64 {
        (self.direction * 10.0).round() / 10.0
    }
}

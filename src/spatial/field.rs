//! Normalised field coordinates.
//!
//! `x` runs across the field (0 = left sideline), `y` along it
//! (0 = the lower end line). Both axes are in [0, 1].

use serde::{Deserialize, Serialize};

pub const FIELD_WIDTH_YARDS: f64 = 40.0;
pub const FIELD_LENGTH_YARDS: f64 = 110.0;
pub const END_ZONE_DEPTH_YARDS: f64 = 20.0;

/// End-zone depth as a share of the field length
pub const END_ZONE_RATIO: f64 = END_ZONE_DEPTH_YARDS / FIELD_LENGTH_YARDS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl FieldPoint {
    /// Clamps into the field; non-finite input lands on the origin axis
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn from_yards(x_yards: f64, y_yards: f64) -> Self {
        Self::new(x_yards / FIELD_WIDTH_YARDS, y_yards / FIELD_LENGTH_YARDS)
    }

    pub fn to_yards(&self) -> (f64, f64) {
        (self.x * FIELD_WIDTH_YARDS, self.y * FIELD_LENGTH_YARDS)
    }

    /// Distance in normalised units, as used for hit-testing
    pub fn distance_to(&self, other: &FieldPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Real-world distance, correcting for the field aspect ratio
    pub fn yards_to(&self, other: &FieldPoint) -> f64 {
        let (ax, ay) = self.to_yards();
        let (bx, by) = other.to_yards();
        (ax - bx).hypot(ay - by)
    }

    pub fn zone(&self) -> FieldZone {
        if self.y < END_ZONE_RATIO {
            FieldZone::LowerEndZone
        } else if self.y > 1.0 - END_ZONE_RATIO {
            FieldZone::UpperEndZone
        } else {
            FieldZone::CentralZone
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldZone {
    LowerEndZone,
    CentralZone,
    UpperEndZone,
}

/// End line the team on offense is attacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttackDirection {
    /// Towards `y = 1`
    Up,
    /// Towards `y = 0`
    Down,
}

impl AttackDirection {
    pub fn flipped(self) -> Self {
        match self {
            AttackDirection::Up => AttackDirection::Down,
            AttackDirection::Down => AttackDirection::Up,
        }
    }

    pub fn scoring_zone(self) -> FieldZone {
        match self {
            AttackDirection::Up => FieldZone::UpperEndZone,
            AttackDirection::Down => FieldZone::LowerEndZone,
        }
    }

    pub fn is_in_scoring_zone(self, point: &FieldPoint) -> bool {
        point.zone() == self.scoring_zone()
    }

    /// Yards of field position gained, negative for a backwards throw
    pub fn yards_gained(self, from: &FieldPoint, to: &FieldPoint) -> f64 {
        let delta = (to.y - from.y) * FIELD_LENGTH_YARDS;
        match self {
            AttackDirection::Up => delta,
            AttackDirection::Down => -delta,
        }
    }
}

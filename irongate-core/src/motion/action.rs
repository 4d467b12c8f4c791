//! Action categories and their timing and pose rules

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// Travel rate for `move` actions (units per second)
pub const MOVE_UNITS_PER_S: f64 = 200.0;

/// Rotation rate for `turn` actions (degrees per second)
pub const TURN_DEG_PER_S: f64 = 90.0;

/// Fixed duration of a `grip` action
pub const GRIP_DURATION_S: f64 = 0.5;

/// Fixed duration of an unrecognized action
pub const UNKNOWN_DURATION_S: f64 = 1.0;

/// Action category of a node
///
/// Any label outside the four known categories loads as `Other`, which
/// takes time but does not move the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum ActionCategory {
    /// Drive along the current heading (value = distance)
    Move,
    /// Rotate in place (value = degrees)
    Turn,
    /// Stand still (value = seconds)
    Wait,
    /// Close or open the gripper (value = strength)
    Grip,
    /// Unrecognized label
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

impl ActionCategory {
    /// Category label
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Move => "move",
            ActionCategory::Turn => "turn",
            ActionCategory::Wait => "wait",
            ActionCategory::Grip => "grip",
            ActionCategory::Other => "other",
        }
    }

    /// Value given to a freshly placed node of this category
    pub fn default_value(&self) -> f64 {
        match self {
            ActionCategory::Move => 100.0,
            ActionCategory::Turn => 90.0,
            ActionCategory::Wait => 2.0,
            ActionCategory::Grip => 50.0,
            ActionCategory::Other => 0.0,
        }
    }
}

/// Timing parameters for action durations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionProfile {
    /// Travel rate for `move` (units/s, must be positive)
    pub move_units_per_s: f64,
    /// Rotation rate for `turn` (degrees/s, must be positive)
    pub turn_deg_per_s: f64,
    /// Fixed `grip` duration (s)
    pub grip_duration_s: f64,
    /// Fixed duration for unrecognized actions (s)
    pub unknown_duration_s: f64,
}

impl Default for ActionProfile {
    fn default() -> Self {
        Self {
            move_units_per_s: MOVE_UNITS_PER_S,
            turn_deg_per_s: TURN_DEG_PER_S,
            grip_duration_s: GRIP_DURATION_S,
            unknown_duration_s: UNKNOWN_DURATION_S,
        }
    }
}

impl ActionProfile {
    /// Duration of an action in seconds
    ///
    /// `wait` uses its value as-is, so a negative wait yields a negative
    /// duration.
    pub fn duration(&self, category: ActionCategory, value: f64) -> f64 {
        match category {
            ActionCategory::Move => libm::fabs(value) / self.move_units_per_s,
            ActionCategory::Turn => libm::fabs(value) / self.turn_deg_per_s,
            ActionCategory::Wait => value,
            ActionCategory::Grip => self.grip_duration_s,
            ActionCategory::Other => self.unknown_duration_s,
        }
    }
}

/// Pose after performing an action from `pose`
///
/// `move` travels along the heading held before the action; `turn` adds
/// to the heading. Every other category leaves the pose untouched.
pub fn apply_action(pose: &Pose, category: ActionCategory, value: f64) -> Pose {
    match category {
        ActionCategory::Move => {
            let rad = pose.angle_rad();
            Pose {
                x: pose.x + value * libm::cos(rad),
                y: pose.y + value * libm::sin(rad),
                angle: pose.angle,
            }
        }
        ActionCategory::Turn => Pose {
            angle: pose.angle + value,
            ..*pose
        },
        ActionCategory::Wait | ActionCategory::Grip | ActionCategory::Other => *pose,
    }
}

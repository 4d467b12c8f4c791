//! Flat 2D robot pose

use core::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Robot position and heading
///
/// The heading is in degrees and is never normalized: turns accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees
    pub angle: f64,
}

impl Pose {
    /// Origin facing along +x
    pub const ORIGIN: Pose = Pose::new(0.0, 0.0, 0.0);

    /// Where the product places the robot before a run
    pub const HOME: Pose = Pose::new(100.0, 100.0, 0.0);

    /// Create a new pose
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    /// Heading in radians
    pub fn angle_rad(&self) -> f64 {
        self.angle * PI / 180.0
    }

    /// Linearly interpolate towards `to`
    ///
    /// Each component is interpolated independently; `progress` is not
    /// clamped.
    pub fn lerp(&self, to: &Pose, progress: f64) -> Pose {
        Pose {
            x: self.x + (to.x - self.x) * progress,
            y: self.y + (to.y - self.y) * progress,
            angle: self.angle + (to.angle - self.angle) * progress,
        }
    }
}

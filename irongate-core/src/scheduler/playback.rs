//! Playback clock
//!
//! Tick-driven playback state. The clock owns no timer: whoever drives it
//! calls [`PlaybackClock::tick`] once per wall-clock period and forwards
//! the returned frame.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::timeline::Timeline;
use crate::motion::Pose;

/// Simulated seconds advanced per tick at speed 1.0
pub const DEFAULT_TICK_S: f64 = 0.1;

/// Playback parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaybackConfig {
    /// Simulated seconds per tick at speed 1.0
    pub tick_s: f64,
    /// Speed multiplier
    pub speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_s: DEFAULT_TICK_S,
            speed: 1.0,
        }
    }
}

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaybackPhase {
    /// Not started, or stopped
    #[default]
    Idle,
    /// Advancing on every tick
    Playing,
    /// Holding the current time
    Paused,
    /// Reached the end of the timeline
    Finished,
}

/// Pose readout for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaybackFrame {
    /// Simulated time of this frame
    pub time_s: f64,
    pub pose: Pose,
    /// Last frame of the run
    pub finished: bool,
}

/// Playback state machine
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    config: PlaybackConfig,
    phase: PlaybackPhase,
    time_s: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl PlaybackClock {
    /// Create an idle clock
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            phase: PlaybackPhase::Idle,
            time_s: 0.0,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Current simulated time
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// Start playing from t = 0
    ///
    /// Returns false (and stays put) when there is nothing to play.
    pub fn start(&mut self, timeline: &Timeline) -> bool {
        if timeline.is_empty() {
            return false;
        }
        self.time_s = 0.0;
        self.phase = PlaybackPhase::Playing;
        true
    }

    /// Pause a running playback
    pub fn pause(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.phase = PlaybackPhase::Paused;
        }
    }

    /// Resume a paused playback
    pub fn resume(&mut self) {
        if self.phase == PlaybackPhase::Paused {
            self.phase = PlaybackPhase::Playing;
        }
    }

    /// Stop and rewind to t = 0
    pub fn stop(&mut self) {
        self.phase = PlaybackPhase::Idle;
        self.time_s = 0.0;
    }

    /// Jump to time `t`, clamped to `[0, total_duration]`
    ///
    /// Non-finite times are ignored. The phase is left unchanged.
    pub fn seek(&mut self, timeline: &Timeline, t: f64) -> Pose {
        if t.is_finite() {
            let total = timeline.total_duration();
            self.time_s = if t < 0.0 {
                0.0
            } else if t > total {
                total
            } else {
                t
            };
        }
        self.pose(timeline)
    }

    /// Change the speed multiplier
    ///
    /// Only positive finite speeds are accepted.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if speed.is_finite() && speed > 0.0 {
            self.config.speed = speed;
            true
        } else {
            false
        }
    }

    /// Pose at the current time
    ///
    /// An idle clock reports the timeline's start pose.
    pub fn pose(&self, timeline: &Timeline) -> Pose {
        match self.phase {
            PlaybackPhase::Idle if self.time_s == 0.0 => timeline.start_pose(),
            _ => timeline.pose_at(self.time_s),
        }
    }

    /// Advance one tick
    ///
    /// Returns `None` unless playing. The tick that reaches the end of the
    /// timeline is clamped to `total_duration`, flagged `finished`, and
    /// moves the clock to `Finished`.
    pub fn tick(&mut self, timeline: &Timeline) -> Option<PlaybackFrame> {
        if self.phase != PlaybackPhase::Playing {
            return None;
        }

        let total = timeline.total_duration();
        let next = self.time_s + self.config.tick_s * self.config.speed;
        let finished = next >= total;
        self.time_s = if finished { total } else { next };
        if finished {
            self.phase = PlaybackPhase::Finished;
        }

        Some(PlaybackFrame {
            time_s: self.time_s,
            pose: timeline.pose_at(self.time_s),
            finished,
        })
    }
}

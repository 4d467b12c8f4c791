//! Movement scheduler
//!
//! Linearizes a logic graph into a timed movement sequence and plays it
//! back on an externally driven clock.

pub mod playback;
pub mod timeline;

pub use playback::{PlaybackClock, PlaybackConfig, PlaybackFrame, PlaybackPhase, DEFAULT_TICK_S};
pub use timeline::{simulate, Movement, SimulationConfig, Timeline};

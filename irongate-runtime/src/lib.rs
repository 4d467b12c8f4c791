//! Runtime boundary of the IronGate logic graph engine
//!
//! Everything that touches the outside world lives here:
//!
//! - Loading graph records from an id-keyed configuration store
//! - Saving graph snapshots
//! - Driving playback from a periodic tick and publishing poses

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod config;
pub mod playback;

pub use config::{parse_config, ConfigStore, GraphLoader, LoadError, ParseError, RecordFormat, StoreError};
pub use playback::{run_playback, run_playback_until, PlaybackOutcome, PoseSink, TickSource, TICK_INTERVAL_MS};

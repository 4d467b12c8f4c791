//! Board-agnostic core of the IronGate logic graph engine
//!
//! This crate contains all logic that does not depend on how a graph is
//! stored, rendered, or clocked:
//!
//! - Graph model (action nodes and directed connections)
//! - Safety check (cycle detection with a witness path)
//! - Action semantics (durations and pose deltas)
//! - Movement scheduler (graph linearization and playback)
//! - Configuration records and value coercion

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod graph;
pub mod motion;
pub mod safety;
pub mod scheduler;

#[cfg(test)]
mod properties;

pub use graph::{Edge, EdgeId, Graph, GraphError, Node, NodeId};
pub use motion::{ActionCategory, ActionProfile, Pose};
pub use safety::{detect_cycle, CycleReport, Verdict};
pub use scheduler::{simulate, Movement, PlaybackClock, PlaybackFrame, SimulationConfig, Timeline};

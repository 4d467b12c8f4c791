//! Safety check
//!
//! A logic graph is only safe to run once it is known to terminate, i.e.
//! it contains no directed cycle.

pub mod cycle;

pub use cycle::{detect_cycle, CycleMessage, CycleReport, Verdict};

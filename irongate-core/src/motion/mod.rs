//! Action semantics
//!
//! Pure mapping from an action (category + value) to its duration and to
//! the pose it leaves the robot in.

pub mod action;
pub mod pose;

pub use action::{apply_action, ActionCategory, ActionProfile};
pub use pose::Pose;

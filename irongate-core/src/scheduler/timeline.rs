//! Movement timeline
//!
//! The simulator walks the graph breadth-first from its start nodes and
//! runs every reached action on one shared pose and clock, so branches and
//! disconnected chains are laid out one after another.

use heapless::{Deque, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, MAX_NODES};
use crate::motion::{apply_action, ActionCategory, ActionProfile, Pose};

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Pose before the first action
    pub start_pose: Pose,
    /// Action timing
    pub profile: ActionProfile,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_pose: Pose::HOME,
            profile: ActionProfile::default(),
        }
    }
}

impl SimulationConfig {
    /// Default parameters with a different start pose
    pub fn starting_at(start_pose: Pose) -> Self {
        Self {
            start_pose,
            ..Default::default()
        }
    }
}

/// One simulated action
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Movement {
    pub node_id: NodeId,
    pub category: ActionCategory,
    pub value: f64,
    /// Seconds; negative only for a negative `wait`
    pub duration_s: f64,
    pub start_s: f64,
    /// `start_s + duration_s`
    pub end_s: f64,
    pub from_pose: Pose,
    pub to_pose: Pose,
}

impl Movement {
    /// Check if `t` falls within this movement (inclusive)
    pub fn contains(&self, t: f64) -> bool {
        self.start_s <= t && t <= self.end_s
    }

    /// Interpolated pose at time `t`
    ///
    /// A zero-length movement is treated as complete.
    pub fn pose_at(&self, t: f64) -> Pose {
        let progress = if self.duration_s == 0.0 {
            1.0
        } else {
            (t - self.start_s) / self.duration_s
        };
        self.from_pose.lerp(&self.to_pose, progress)
    }
}

/// Ordered movements produced by [`simulate`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timeline {
    start_pose: Pose,
    movements: Vec<Movement, MAX_NODES>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(start_pose: Pose) -> Self {
        Self {
            start_pose,
            movements: Vec::new(),
        }
    }

    /// Pose before any movement
    pub fn start_pose(&self) -> Pose {
        self.start_pose
    }

    /// Movements in execution order
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Number of movements
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Check if there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Latest end time over all movements (0 when empty)
    pub fn total_duration(&self) -> f64 {
        let mut ends = self.movements.iter().map(|m| m.end_s);
        let Some(first) = ends.next() else {
            return 0.0;
        };
        ends.fold(first, |max, end| if end > max { end } else { max })
    }

    /// Movement in progress at time `t`, if any
    pub fn movement_at(&self, t: f64) -> Option<&Movement> {
        self.movements.iter().find(|m| m.contains(t))
    }

    /// Robot pose at time `t`
    ///
    /// The first movement covering `t` is interpolated. Outside every
    /// movement, a time at or before the first start holds the first
    /// `from_pose` and a time at or after the last end holds the last
    /// `to_pose`.
    pub fn pose_at(&self, t: f64) -> Pose {
        let (Some(first), Some(last)) = (self.movements.first(), self.movements.last()) else {
            return self.start_pose;
        };
        if let Some(current) = self.movement_at(t) {
            return current.pose_at(t);
        }
        if t <= first.start_s {
            return first.from_pose;
        }
        if t >= last.end_s {
            return last.to_pose;
        }

        // Only negative waits leave uncovered gaps; hold the last pose reached
        self.movements
            .iter()
            .rev()
            .find(|m| m.end_s <= t)
            .map(|m| m.to_pose)
            .unwrap_or(self.start_pose)
    }
}

/// Linearize a graph into a movement timeline
///
/// Start nodes are those without incoming edges, in graph order; a graph
/// where every node has an incoming edge starts at its first node. Each
/// reachable node runs exactly once, in breadth-first discovery order.
/// Nodes only reachable through a cycle that no start node enters are left
/// out.
pub fn simulate(graph: &Graph, config: &SimulationConfig) -> Timeline {
    let mut timeline = Timeline::new(config.start_pose);
    if graph.is_empty() {
        return timeline;
    }

    let nodes = graph.nodes();
    let edges = graph.indexed_edges();

    let mut has_incoming = [false; MAX_NODES];
    for &(_, to) in edges.iter() {
        has_incoming[to] = true;
    }

    // A node enters the queue at most once, so MAX_NODES slots always suffice
    let mut queue: Deque<usize, MAX_NODES> = Deque::new();
    let mut queued = [false; MAX_NODES];
    for index in 0..nodes.len() {
        if !has_incoming[index] {
            queued[index] = true;
            let _ = queue.push_back(index);
        }
    }
    if queue.is_empty() {
        queued[0] = true;
        let _ = queue.push_back(0);
    }

    let mut pose = config.start_pose;
    let mut time_s = 0.0;

    while let Some(index) = queue.pop_front() {
        let node = &nodes[index];
        let duration_s = config.profile.duration(node.category, node.value);
        let to_pose = apply_action(&pose, node.category, node.value);

        let _ = timeline.movements.push(Movement {
            node_id: node.id.clone(),
            category: node.category,
            value: node.value,
            duration_s,
            start_s: time_s,
            end_s: time_s + duration_s,
            from_pose: pose,
            to_pose,
        });

        time_s += duration_s;
        pose = to_pose;

        for &(from, to) in edges.iter() {
            if from == index && !queued[to] {
                queued[to] = true;
                let _ = queue.push_back(to);
            }
        }
    }

    timeline
}

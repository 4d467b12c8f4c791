//! Cycle detection
//!
//! Three-color depth-first search over the nodes in graph order. The first
//! back edge found ends the search and the path stack from its target to
//! the top becomes the witness.

use core::fmt;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, MAX_NODES};

/// Outcome of a cycle check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verdict {
    /// Nothing to analyze (no nodes or no edges)
    Empty,
    /// No cycle reachable anywhere in the graph
    Safe,
    /// At least one directed cycle exists
    Cycle,
}

/// Result of [`detect_cycle`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleReport {
    pub verdict: Verdict,
    /// Witness cycle in traversal order; empty unless `verdict` is `Cycle`
    ///
    /// Every consecutive pair, and the last node back to the first, is
    /// joined by an edge of the graph.
    pub cycle_path: Vec<NodeId, MAX_NODES>,
}

impl CycleReport {
    fn empty() -> Self {
        Self {
            verdict: Verdict::Empty,
            cycle_path: Vec::new(),
        }
    }

    fn safe() -> Self {
        Self {
            verdict: Verdict::Safe,
            cycle_path: Vec::new(),
        }
    }

    /// Check if the graph contains a cycle
    pub fn has_cycle(&self) -> bool {
        self.verdict == Verdict::Cycle
    }

    /// Human readable summary
    pub fn message(&self) -> CycleMessage<'_> {
        CycleMessage(self)
    }
}

/// Display adapter for [`CycleReport::message`]
pub struct CycleMessage<'a>(&'a CycleReport);

impl fmt::Display for CycleMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.verdict {
            Verdict::Empty => f.write_str("No labels or connections to analyze"),
            Verdict::Safe => f.write_str("No infinite loops detected. Logic is safe!"),
            Verdict::Cycle => {
                f.write_str("Infinite loop detected! Cycle: ")?;
                for id in self.0.cycle_path.iter() {
                    write!(f, "{} → ", id)?;
                }
                // Close the loop back to where it started
                match self.0.cycle_path.first() {
                    Some(first) => write!(f, "{}", first),
                    None => Ok(()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Finished,
}

/// Check a graph for directed cycles
///
/// Every component is scanned, starting from each unvisited node in graph
/// order. Duplicate edges and self-loops are handled; the graph is not
/// modified.
pub fn detect_cycle(graph: &Graph) -> CycleReport {
    if graph.is_empty() || graph.edge_count() == 0 {
        return CycleReport::empty();
    }

    let edges = graph.indexed_edges();
    let mut marks = [Mark::Unvisited; MAX_NODES];
    // (node index, next edge to inspect)
    let mut stack: Vec<(usize, usize), MAX_NODES> = Vec::new();

    for root in 0..graph.node_count() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        // Stack depth never exceeds the node count
        let _ = stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = edges
                .iter()
                .enumerate()
                .skip(frame.1)
                .find(|(_, (from, _))| *from == node)
                .map(|(i, &(_, to))| (i, to));

            let Some((edge_index, target)) = next else {
                marks[node] = Mark::Finished;
                stack.pop();
                continue;
            };
            frame.1 = edge_index + 1;

            match marks[target] {
                Mark::OnStack => return witness(graph, &stack, target),
                Mark::Unvisited => {
                    marks[target] = Mark::OnStack;
                    let _ = stack.push((target, 0));
                }
                Mark::Finished => {}
            }
        }
    }

    CycleReport::safe()
}

fn witness(graph: &Graph, stack: &[(usize, usize)], target: usize) -> CycleReport {
    let nodes = graph.nodes();
    let start = stack.iter().position(|&(n, _)| n == target).unwrap_or(0);
    let cycle_path = stack[start..]
        .iter()
        .map(|&(n, _)| nodes[n].id.clone())
        .collect();

    CycleReport {
        verdict: Verdict::Cycle,
        cycle_path,
    }
}

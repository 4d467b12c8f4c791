//! Graph, node and edge types

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::GraphError;
use super::ids::{EdgeId, NodeId};
use crate::config::{to_number_or_default, EdgeConfig, GraphConfig, NodeConfig, RawValue, CONFIG_VERSION};
use crate::motion::ActionCategory;

/// Maximum nodes per graph
pub const MAX_NODES: usize = 64;

/// Maximum edges per graph
pub const MAX_EDGES: usize = 128;

/// Display coordinate of a node
///
/// Only used for rendering; simulation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An action node (one robot instruction)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Unique id, stable for the node's lifetime
    pub id: NodeId,
    /// Action category
    pub category: ActionCategory,
    /// Magnitude (distance, degrees, seconds or grip strength)
    pub value: f64,
    /// Display coordinate
    pub position: Option<Position>,
}

impl Node {
    /// Create a node with an explicit value
    pub fn new(id: NodeId, category: ActionCategory, value: f64) -> Self {
        Self {
            id,
            category,
            value,
            position: None,
        }
    }

    /// Create a node placed by the user, using the category's default value
    pub fn placed(id: NodeId, category: ActionCategory, position: Position) -> Self {
        Self {
            id,
            category,
            value: category.default_value(),
            position: Some(position),
        }
    }

    /// Set the display position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Build a node from a configuration record, coercing its value
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            id: config.id.clone(),
            category: config.category,
            value: to_number_or_default(&config.value, 0.0),
            position: config.position,
        }
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Unique id
    pub id: EdgeId,
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
}

impl Edge {
    /// Create a new edge
    pub fn new(id: EdgeId, from: NodeId, to: NodeId) -> Self {
        Self { id, from, to }
    }
}

/// A logic graph
///
/// Nodes keep their insertion order, which is the iteration order used by
/// cycle detection and by start-node inference in the simulator.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node, MAX_NODES>,
    edges: Vec<Edge, MAX_EDGES>,
    /// Last serial handed out by `connect`
    connection_serial: u32,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            connection_serial: 0,
        }
    }

    /// Build a graph from a configuration record
    ///
    /// Either every node and edge is accepted or an error is returned.
    pub fn from_config(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in config.nodes.iter() {
            graph.add_node(Node::from_config(node))?;
        }
        for edge in config.edges.iter() {
            graph.add_edge(Edge::new(edge.id.clone(), edge.from.clone(), edge.to.clone()))?;
        }
        Ok(graph)
    }

    /// Export the graph as a configuration record
    pub fn to_config(&self) -> GraphConfig {
        // Config capacities match graph capacities, so collecting cannot overflow
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeConfig {
                id: n.id.clone(),
                category: n.category,
                value: RawValue::Number(n.value),
                position: n.position,
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|e| EdgeConfig {
                id: e.id.clone(),
                from: e.from.clone(),
                to: e.to.clone(),
            })
            .collect();

        GraphConfig {
            version: CONFIG_VERSION,
            nodes,
            edges,
        }
    }

    /// Add a node
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes
            .push(node)
            .map_err(|_| GraphError::CapacityExceeded)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GraphError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| e.from != *id && e.to != *id);
        Ok(node)
    }

    /// Add an edge
    ///
    /// Both endpoints must already be in the graph.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.contains_edge(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.from, &edge.to] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::InvalidReference {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        self.edges
            .push(edge)
            .map_err(|_| GraphError::CapacityExceeded)
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| GraphError::UnknownEdge(id.clone()))?;
        Ok(self.edges.remove(index))
    }

    /// Connect two nodes the way the editor does
    ///
    /// Refuses a self-connection and a pair that is already connected in
    /// either direction (returns `Ok(None)`). Otherwise adds an edge with a
    /// generated `conn-<n>` id and returns it.
    pub fn connect(&mut self, from: &NodeId, to: &NodeId) -> Result<Option<EdgeId>, GraphError> {
        for endpoint in [from, to] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::UnknownNode(endpoint.clone()));
            }
        }
        if from == to {
            return Ok(None);
        }
        let connected = self
            .edges
            .iter()
            .any(|e| (e.from == *from && e.to == *to) || (e.from == *to && e.to == *from));
        if connected {
            return Ok(None);
        }

        let mut serial = self.connection_serial;
        let id = loop {
            serial = serial.wrapping_add(1);
            let candidate = EdgeId::numbered(serial);
            if !self.contains_edge(&candidate) {
                break candidate;
            }
        };

        self.add_edge(Edge::new(id.clone(), from.clone(), to.clone()))?;
        self.connection_serial = serial;
        Ok(Some(id))
    }

    /// Update a node's value
    pub fn set_value(&mut self, id: &NodeId, value: f64) -> Result<(), GraphError> {
        self.node_mut(id)?.value = value;
        Ok(())
    }

    /// Update a node's display position
    pub fn set_position(&mut self, id: &NodeId, position: Option<Position>) -> Result<(), GraphError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Look up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// Look up an edge by id
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    /// Check if a node exists
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Check if an edge exists
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving a node, in edge order
    pub fn outgoing_edges<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == *id)
    }

    /// Edges entering a node, in edge order
    pub fn incoming_edges<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.to == *id)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node in iteration order
    pub(crate) fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == *id)
    }

    /// Edges as `(from, to)` node indices, in edge order
    pub(crate) fn indexed_edges(&self) -> Vec<(usize, usize), MAX_EDGES> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.index_of(&e.from)?, self.index_of(&e.to)?)))
            .collect()
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))
    }
}

//! Structural graph errors

use core::fmt;

use super::ids::{EdgeId, NodeId};

/// Errors raised by graph construction and edits
///
/// A failed operation never leaves the graph partially modified.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GraphError {
    /// An edge endpoint does not name a node in the graph
    InvalidReference {
        /// Edge being added
        edge: EdgeId,
        /// Missing endpoint
        node: NodeId,
    },
    /// A node with this id already exists
    DuplicateNode(NodeId),
    /// An edge with this id already exists
    DuplicateEdge(EdgeId),
    /// No node with this id
    UnknownNode(NodeId),
    /// No edge with this id
    UnknownEdge(EdgeId),
    /// Node or edge capacity exhausted
    CapacityExceeded,
    /// Identifier longer than `MAX_ID_LEN` bytes
    IdTooLong,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidReference { edge, node } => {
                write!(f, "connection {} references unknown label {}", edge, node)
            }
            GraphError::DuplicateNode(id) => write!(f, "label {} already exists", id),
            GraphError::DuplicateEdge(id) => write!(f, "connection {} already exists", id),
            GraphError::UnknownNode(id) => write!(f, "no label {}", id),
            GraphError::UnknownEdge(id) => write!(f, "no connection {}", id),
            GraphError::CapacityExceeded => f.write_str("graph capacity exceeded"),
            GraphError::IdTooLong => f.write_str("identifier too long"),
        }
    }
}

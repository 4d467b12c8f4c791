//! Logic graph model
//!
//! Action nodes connected by directed edges. The graph owns both
//! collections and rejects any edit that would break its invariants
//! before touching its state.

pub mod error;
pub mod ids;
pub mod model;

pub use error::GraphError;
pub use ids::{EdgeId, NodeId, MAX_ID_LEN};
pub use model::{Edge, Graph, Node, Position, MAX_EDGES, MAX_NODES};

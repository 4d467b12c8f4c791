//! Node and edge identifiers
//!
//! Identifiers are opaque strings supplied by the configuration store or
//! generated by the editor. They are stored inline, so an id longer than
//! [`MAX_ID_LEN`] bytes is rejected up front.

use core::fmt::{self, Write};

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::GraphError;

/// Maximum identifier length in bytes
pub const MAX_ID_LEN: usize = 32;

/// Identifier of an action node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct NodeId(String<MAX_ID_LEN>);

impl NodeId {
    /// Create a node id from a string
    pub fn new(id: &str) -> Result<Self, GraphError> {
        String::try_from(id)
            .map(Self)
            .map_err(|_| GraphError::IdTooLong)
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct EdgeId(String<MAX_ID_LEN>);

impl EdgeId {
    /// Create an edge id from a string
    pub fn new(id: &str) -> Result<Self, GraphError> {
        String::try_from(id)
            .map(Self)
            .map_err(|_| GraphError::IdTooLong)
    }

    /// Create a generated connection id (`conn-<serial>`)
    pub fn numbered(serial: u32) -> Self {
        let mut id = String::new();
        // "conn-" plus at most ten digits always fits
        let _ = write!(id, "conn-{}", serial);
        Self(id)
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

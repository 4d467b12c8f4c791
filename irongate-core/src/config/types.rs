//! Configuration record definitions
//!
//! Field aliases accept the names older records were written with:
//! `type` for `category`, `val` for `value`, `from_id` / `to_id` for the
//! edge endpoints.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::value::RawValue;
use crate::graph::{EdgeId, NodeId, Position, MAX_EDGES, MAX_NODES};
use crate::motion::ActionCategory;

/// Current configuration record version
pub const CONFIG_VERSION: u8 = 1;

#[cfg(feature = "serde")]
fn default_version() -> u8 {
    CONFIG_VERSION
}

/// Stored form of an action node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeConfig {
    pub id: NodeId,
    /// Unknown labels load as `Other`
    #[cfg_attr(feature = "serde", serde(default, alias = "type"))]
    pub category: ActionCategory,
    /// Uncoerced value as found in the record
    #[cfg_attr(feature = "serde", serde(default, alias = "val"))]
    pub value: RawValue,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<Position>,
}

/// Stored form of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeConfig {
    pub id: EdgeId,
    #[cfg_attr(feature = "serde", serde(alias = "from_id"))]
    pub from: NodeId,
    #[cfg_attr(feature = "serde", serde(alias = "to_id"))]
    pub to: NodeId,
}

/// A complete graph record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphConfig {
    /// Record format version
    #[cfg_attr(feature = "serde", serde(default = "default_version"))]
    pub version: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes: Vec<NodeConfig, MAX_NODES>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<EdgeConfig, MAX_EDGES>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl GraphConfig {
    /// Check if the record version is supported
    pub fn is_current(&self) -> bool {
        self.version == CONFIG_VERSION
    }
}

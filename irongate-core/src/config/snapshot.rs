//! Binary snapshots
//!
//! A saved graph is a postcard-encoded [`GraphConfig`]. The version field
//! is checked on decode so an outdated snapshot is refused instead of being
//! misread.

use core::fmt;

use super::types::{GraphConfig, CONFIG_VERSION};

/// Buffer size that fits a snapshot of a full graph
pub const MAX_SNAPSHOT_LEN: usize = 18 * 1024;

/// Snapshot encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnapshotError {
    /// Output buffer too small
    Encode,
    /// Corrupt or truncated data
    Decode,
    /// Snapshot written by an incompatible version
    VersionMismatch { found: u8 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Encode => f.write_str("snapshot buffer too small"),
            SnapshotError::Decode => f.write_str("corrupt snapshot"),
            SnapshotError::VersionMismatch { found } => write!(
                f,
                "snapshot version {} (expected {})",
                found, CONFIG_VERSION
            ),
        }
    }
}

/// Encode a graph record into `buf`, returning the used prefix
pub fn encode_snapshot<'a>(config: &GraphConfig, buf: &'a mut [u8]) -> Result<&'a mut [u8], SnapshotError> {
    postcard::to_slice(config, buf).map_err(|_| SnapshotError::Encode)
}

/// Decode and version-check a graph record
pub fn decode_snapshot(bytes: &[u8]) -> Result<GraphConfig, SnapshotError> {
    let config: GraphConfig = postcard::from_bytes(bytes).map_err(|_| SnapshotError::Decode)?;
    if !config.is_current() {
        return Err(SnapshotError::VersionMismatch {
            found: config.version,
        });
    }
    Ok(config)
}

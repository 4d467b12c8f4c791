//! Graph record persistence
//!
//! Loads graph records from a [`ConfigStore`]. A TOML record wins when one
//! exists; otherwise the last saved snapshot is used.

use core::fmt;

use irongate_core::config::{decode_snapshot, encode_snapshot, GraphConfig, SnapshotError, MAX_SNAPSHOT_LEN};
use irongate_core::graph::{Graph, GraphError};

use super::store::{ConfigStore, RecordFormat, StoreError};
use super::toml::{parse_bytes, ParseError};

/// Maximum TOML record size
pub const MAX_TOML_LEN: usize = 16 * 1024;

/// Loader errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Store operation failed
    Store(StoreError),
    /// TOML record rejected
    Parse(ParseError),
    /// Snapshot rejected
    Snapshot(SnapshotError),
    /// Record does not describe a valid graph
    Graph(GraphError),
}

impl From<StoreError> for LoadError {
    fn from(e: StoreError) -> Self {
        LoadError::Store(e)
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<SnapshotError> for LoadError {
    fn from(e: SnapshotError) -> Self {
        LoadError::Snapshot(e)
    }
}

impl From<GraphError> for LoadError {
    fn from(e: GraphError) -> Self {
        LoadError::Graph(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Store(e) => write!(f, "store: {}", e),
            LoadError::Parse(e) => write!(f, "toml: {}", e),
            LoadError::Snapshot(e) => write!(f, "snapshot: {}", e),
            LoadError::Graph(e) => write!(f, "graph: {}", e),
        }
    }
}

/// Loads and saves graph records
pub struct GraphLoader<S> {
    store: S,
}

impl<S: ConfigStore> GraphLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Give the store back
    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the record stored under `id`
    ///
    /// Tries the TOML record first and falls back to the snapshot when it is
    /// missing or unreadable. A record for another format version is an
    /// error in either format. When an unreadable TOML record has no
    /// snapshot behind it, the TOML error is returned.
    pub async fn load(&mut self, id: &str) -> Result<GraphConfig, LoadError> {
        info!("Loading graph record {}", id);

        let toml_error = match self.load_toml(id).await {
            Ok(config) => {
                info!("Loaded graph record from TOML");
                return Ok(config);
            }
            Err(LoadError::Store(StoreError::NotFound)) => {
                debug!("No TOML record, trying snapshot");
                None
            }
            Err(e @ LoadError::Parse(ParseError::VersionMismatch { .. })) => {
                warn!("TOML record has an unsupported version");
                return Err(e);
            }
            Err(e) => {
                warn!("TOML record unreadable, trying snapshot");
                Some(e)
            }
        };

        match (self.load_snapshot(id).await, toml_error) {
            (Err(LoadError::Store(StoreError::NotFound)), Some(e)) => {
                warn!("No snapshot to fall back to");
                Err(e)
            }
            (result, _) => result,
        }
    }

    /// Load the record stored under `id` and build its graph
    pub async fn load_graph(&mut self, id: &str) -> Result<Graph, LoadError> {
        let config = self.load(id).await?;
        let graph = Graph::from_config(&config)?;
        Ok(graph)
    }

    /// Save `graph` as a snapshot under `id`
    ///
    /// Returns the snapshot size in bytes.
    pub async fn save_snapshot(&mut self, id: &str, graph: &Graph) -> Result<usize, LoadError> {
        let config = graph.to_config();
        let mut buffer = [0u8; MAX_SNAPSHOT_LEN];
        let bytes = encode_snapshot(&config, &mut buffer)?;
        let len = bytes.len();

        self.store.write(id, RecordFormat::Snapshot, bytes).await?;
        info!("Saved snapshot {} ({} bytes)", id, len);
        Ok(len)
    }

    async fn load_toml(&mut self, id: &str) -> Result<GraphConfig, LoadError> {
        let mut buffer = [0u8; MAX_TOML_LEN];
        let len = self.store.read(id, RecordFormat::Toml, &mut buffer).await?;
        debug!("Read {} bytes of TOML", len);

        let config = parse_bytes(&buffer[..len])?;
        log_summary(&config);
        Ok(config)
    }

    async fn load_snapshot(&mut self, id: &str) -> Result<GraphConfig, LoadError> {
        let mut buffer = [0u8; MAX_SNAPSHOT_LEN];
        let len = self.store.read(id, RecordFormat::Snapshot, &mut buffer).await?;
        debug!("Read {} bytes of snapshot", len);

        let config = decode_snapshot(&buffer[..len]).map_err(|e| {
            if let SnapshotError::VersionMismatch { found } = e {
                warn!("Snapshot version mismatch: found {}", found);
            }
            e
        })?;
        log_summary(&config);
        Ok(config)
    }
}

fn log_summary(config: &GraphConfig) {
    debug!("  {} labels", config.nodes.len());
    for node in config.nodes.iter() {
        debug!("    {}: {}", node.id.as_str(), node.category.as_str());
    }
    debug!("  {} connections", config.edges.len());
}

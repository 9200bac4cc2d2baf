//! Snapshot persistence for the in-memory graph store.
//!
//! Serializes a [`MemoryGraph`] to versioned, human-readable JSON and loads
//! it back, with a cheap metadata peek for listing snapshots without
//! deserializing the whole graph.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::graph::{GraphSnapshot, MemoryGraph};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current snapshot file version.
const SNAPSHOT_VERSION: u32 = 1;

/// A saved graph with everything needed to resume serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGraph {
    /// Snapshot format version for compatibility checking.
    pub version: u32,

    /// When the snapshot was taken (unix seconds, as a string).
    pub saved_at: String,

    /// Quick-access counts (duplicated for peek access).
    pub metadata: SnapshotMetadata,

    /// The full graph dump.
    pub graph: GraphSnapshot,
}

/// Metadata about a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Number of nodes in the snapshot.
    pub node_count: usize,

    /// Number of edges in the snapshot.
    pub edge_count: usize,

    /// When the snapshot was taken.
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGraph {
    /// Take a snapshot of a store.
    pub fn new(store: &MemoryGraph) -> Self {
        let graph = store.snapshot();
        let saved_at = unix_now_string();
        let metadata = SnapshotMetadata {
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            metadata,
            graph,
        }
    }

    /// Rebuild a live store from this snapshot.
    pub fn into_store(self) -> MemoryGraph {
        MemoryGraph::from_snapshot(self.graph)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SNAPSHOT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read a snapshot's metadata without loading the full graph.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SnapshotMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        // Parse just enough to get metadata
        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SnapshotMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SNAPSHOT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Current unix time, seconds, as a string.
fn unix_now_string() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

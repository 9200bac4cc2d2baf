//! Graph store capability and the in-memory reference implementation.
//!
//! Components never talk to a database directly; they consume the
//! [`GraphStore`] capability: find a node by label and property, traverse
//! edges, and run multi-step writes through [`GraphStore::run_atomic`] so a
//! half-created entity is never observable. Uniqueness constraints are
//! declared per (label, property key) and enforced by the store at create
//! time, which is what makes concurrent duplicate registration safe.
//!
//! [`MemoryGraph`] is the bundled backend: node and edge tables behind a
//! reader/writer lock. Write transactions mutate a scratch copy of the state
//! and swap it in on success, so rollback is just a drop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use thiserror::Error;

use super::edge::{Edge, EdgeFilter, EdgeType};
use super::node::{Label, Node, NodeId, Properties};

/// Errors from graph store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("uniqueness constraint violated on {label}.{key}")]
    ConstraintViolation { label: Label, key: String },

    #[error("no node {0} in the store")]
    UnknownNode(NodeId),

    #[error("node {node} does not decode as a {label}: {reason}")]
    Malformed {
        node: NodeId,
        label: Label,
        reason: String,
    },

    #[error("graph store unavailable: {0}")]
    Unavailable(String),
}

/// Read operations shared by the store and its transactions.
pub trait GraphReader {
    /// Find the first node with the given label whose property `key` equals
    /// `value`. Exact match only.
    fn find_one(&self, label: Label, key: &str, value: &Value)
        -> Result<Option<Node>, StoreError>;

    /// Fetch a node by its store handle.
    fn node(&self, id: NodeId) -> Result<Option<Node>, StoreError>;

    /// Enumerate edges passing a filter, in store order.
    fn match_edges(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, StoreError>;
}

/// Write operations, only reachable inside [`GraphStore::run_atomic`].
pub trait GraphWriter: GraphReader {
    /// Create a node. Fails with [`StoreError::ConstraintViolation`] if a
    /// uniqueness constraint on the label is violated.
    fn create_node(&mut self, label: Label, properties: Properties)
        -> Result<Node, StoreError>;

    /// Create a typed directed edge. Both endpoints must exist.
    fn create_edge(
        &mut self,
        from: NodeId,
        edge_type: EdgeType,
        to: NodeId,
    ) -> Result<Edge, StoreError>;

    /// Merge a property patch into an existing node and return the updated
    /// node. Keys absent from the patch are left untouched.
    fn update_properties(&mut self, id: NodeId, patch: Properties)
        -> Result<Node, StoreError>;
}

/// The store capability consumed by every component.
pub trait GraphStore: GraphReader + Send + Sync {
    /// Run a block of reads and writes as a single atomic unit. Either every
    /// write in the block commits, or none do. Reads inside the block see
    /// writes made earlier in the same block.
    fn run_atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GraphWriter) -> Result<T, E>,
        E: From<StoreError>;
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Node and edge tables plus constraint declarations. Cloned wholesale for
/// each write transaction; the sizes this engine works at make that cheap.
#[derive(Debug, Clone, Default)]
struct GraphState {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    constraints: BTreeSet<(Label, String)>,
    next_id: u64,
}

impl GraphState {
    fn find_one(&self, label: Label, key: &str, value: &Value) -> Option<Node> {
        self.nodes
            .values()
            .find(|n| n.label == label && n.properties.get(key) == Some(value))
            .cloned()
    }

    fn check_constraints(&self, label: Label, properties: &Properties)
        -> Result<(), StoreError> {
        for (constrained_label, key) in &self.constraints {
            if *constrained_label != label {
                continue;
            }
            if let Some(value) = properties.get(key) {
                if self.find_one(label, key, value).is_some() {
                    return Err(StoreError::ConstraintViolation {
                        label,
                        key: key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// In-memory graph store with atomic transactions.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    state: RwLock<GraphState>,
}

impl MemoryGraph {
    /// Create an empty store with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the constraints the quest engine relies on:
    /// unique `User.username` and unique `Usergroup.groupname`.
    pub fn with_default_constraints() -> Self {
        let store = Self::new();
        store.add_constraint(Label::User, "username");
        store.add_constraint(Label::Usergroup, "groupname");
        store
    }

    /// Declare a uniqueness constraint on (label, property key). Applies to
    /// node creation from this point on; existing nodes are not re-checked.
    pub fn add_constraint(&self, label: Label, key: &str) {
        let mut state = self.write_lock();
        state.constraints.insert((label, key.to_string()));
    }

    /// Number of nodes in the store.
    pub fn node_count(&self) -> usize {
        self.read_lock().nodes.len()
    }

    /// Number of edges in the store.
    pub fn edge_count(&self) -> usize {
        self.read_lock().edges.len()
    }

    /// Export the full graph for snapshot persistence.
    pub fn snapshot(&self) -> GraphSnapshot {
        let state = self.read_lock();
        GraphSnapshot {
            nodes: state.nodes.values().cloned().collect(),
            edges: state.edges.clone(),
            constraints: state.constraints.iter().cloned().collect(),
            next_id: state.next_id,
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let state = GraphState {
            nodes: snapshot.nodes.into_iter().map(|n| (n.id, n)).collect(),
            edges: snapshot.edges,
            constraints: snapshot.constraints.into_iter().collect(),
            next_id: snapshot.next_id,
        };
        Self {
            state: RwLock::new(state),
        }
    }

    // A poisoned lock means another thread panicked mid-read; the state
    // itself is never left half-written (writes go through the scratch
    // swap), so continuing with the inner value is sound.
    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, GraphState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, GraphState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl GraphReader for MemoryGraph {
    fn find_one(&self, label: Label, key: &str, value: &Value)
        -> Result<Option<Node>, StoreError> {
        Ok(self.read_lock().find_one(label, key, value))
    }

    fn node(&self, id: NodeId) -> Result<Option<Node>, StoreError> {
        Ok(self.read_lock().nodes.get(&id).cloned())
    }

    fn match_edges(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, StoreError> {
        Ok(self
            .read_lock()
            .edges
            .iter()
            .filter(|e| filter.matches(e))
            .copied()
            .collect())
    }
}

impl GraphStore for MemoryGraph {
    fn run_atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GraphWriter) -> Result<T, E>,
        E: From<StoreError>,
    {
        // Holding the write lock for the whole block serializes writers and
        // hides the scratch state from readers until commit.
        let mut guard = self.write_lock();
        let mut txn = MemoryTxn {
            scratch: guard.clone(),
        };
        let value = f(&mut txn)?;
        *guard = txn.scratch;
        tracing::trace!(
            nodes = guard.nodes.len(),
            edges = guard.edges.len(),
            "graph transaction committed"
        );
        Ok(value)
    }
}

/// A write transaction over a scratch copy of the graph.
struct MemoryTxn {
    scratch: GraphState,
}

impl GraphReader for MemoryTxn {
    fn find_one(&self, label: Label, key: &str, value: &Value)
        -> Result<Option<Node>, StoreError> {
        Ok(self.scratch.find_one(label, key, value))
    }

    fn node(&self, id: NodeId) -> Result<Option<Node>, StoreError> {
        Ok(self.scratch.nodes.get(&id).cloned())
    }

    fn match_edges(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, StoreError> {
        Ok(self
            .scratch
            .edges
            .iter()
            .filter(|e| filter.matches(e))
            .copied()
            .collect())
    }
}

impl GraphWriter for MemoryTxn {
    fn create_node(&mut self, label: Label, properties: Properties)
        -> Result<Node, StoreError> {
        self.scratch.check_constraints(label, &properties)?;

        let id = NodeId(self.scratch.next_id);
        self.scratch.next_id += 1;

        let node = Node {
            id,
            label,
            properties,
        };
        self.scratch.nodes.insert(id, node.clone());
        tracing::debug!(%id, %label, "node created");
        Ok(node)
    }

    fn create_edge(
        &mut self,
        from: NodeId,
        edge_type: EdgeType,
        to: NodeId,
    ) -> Result<Edge, StoreError> {
        if !self.scratch.nodes.contains_key(&from) {
            return Err(StoreError::UnknownNode(from));
        }
        if !self.scratch.nodes.contains_key(&to) {
            return Err(StoreError::UnknownNode(to));
        }

        let edge = Edge {
            from,
            edge_type,
            to,
        };
        self.scratch.edges.push(edge);
        tracing::debug!(%from, %to, kind = %edge_type, "edge created");
        Ok(edge)
    }

    fn update_properties(&mut self, id: NodeId, patch: Properties)
        -> Result<Node, StoreError> {
        let node = self
            .scratch
            .nodes
            .get_mut(&id)
            .ok_or(StoreError::UnknownNode(id))?;
        for (key, value) in patch {
            node.properties.insert(key, value);
        }
        Ok(node.clone())
    }
}

/// Serializable dump of a [`MemoryGraph`], consumed by the persistence
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Every node, carrying its store handle.
    pub nodes: Vec<Node>,
    /// Every edge.
    pub edges: Vec<Edge>,
    /// Declared uniqueness constraints.
    pub constraints: Vec<(Label, String)>,
    /// Next node handle to assign.
    pub next_id: u64,
}

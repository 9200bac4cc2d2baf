//! Typed directed edges between nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// The relationship kinds the engine creates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EdgeType {
    /// User owns (administers) a group.
    Owns,
    /// User is a member of a group.
    In,
    /// User authored a quest.
    Created,
    /// Group hosts a quest.
    HasQuest,
    /// Quest pays out a reward line.
    Pays,
    /// User is eligible to complete a quest.
    CanComplete,
}

impl EdgeType {
    /// Get the wire name for this edge type.
    pub fn name(&self) -> &'static str {
        match self {
            EdgeType::Owns => "owns",
            EdgeType::In => "in",
            EdgeType::Created => "created",
            EdgeType::HasQuest => "has_quest",
            EdgeType::Pays => "pays",
            EdgeType::CanComplete => "can_complete",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed, directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The start node.
    pub from: NodeId,
    /// The relationship type.
    pub edge_type: EdgeType,
    /// The end node.
    pub to: NodeId,
}

impl Edge {
    /// Check if this edge touches a specific node at either end.
    pub fn involves(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

/// Filter for edge traversal. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFilter {
    /// Restrict to edges starting at this node.
    pub start: Option<NodeId>,
    /// Restrict to edges ending at this node.
    pub end: Option<NodeId>,
    /// Restrict to this relationship type.
    pub edge_type: Option<EdgeType>,
}

impl EdgeFilter {
    /// Create an empty filter (matches every edge).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to edges starting at a node.
    pub fn starting_at(mut self, node: NodeId) -> Self {
        self.start = Some(node);
        self
    }

    /// Restrict to edges ending at a node.
    pub fn ending_at(mut self, node: NodeId) -> Self {
        self.end = Some(node);
        self
    }

    /// Restrict to a relationship type.
    pub fn typed(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    /// Check whether an edge passes the filter.
    pub fn matches(&self, edge: &Edge) -> bool {
        self.start.map(|n| edge.from == n).unwrap_or(true)
            && self.end.map(|n| edge.to == n).unwrap_or(true)
            && self.edge_type.map(|t| edge.edge_type == t).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: u64, edge_type: EdgeType, to: u64) -> Edge {
        Edge {
            from: NodeId(from),
            edge_type,
            to: NodeId(to),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = EdgeFilter::new();
        assert!(filter.matches(&edge(1, EdgeType::In, 2)));
        assert!(filter.matches(&edge(9, EdgeType::Pays, 4)));
    }

    #[test]
    fn test_filter_combinations() {
        let membership = edge(1, EdgeType::In, 2);
        let ownership = edge(1, EdgeType::Owns, 2);

        let filter = EdgeFilter::new().starting_at(NodeId(1)).typed(EdgeType::In);
        assert!(filter.matches(&membership));
        assert!(!filter.matches(&ownership));

        let filter = EdgeFilter::new().ending_at(NodeId(3));
        assert!(!filter.matches(&membership));
    }

    #[test]
    fn test_edge_involves() {
        let e = edge(4, EdgeType::CanComplete, 7);
        assert!(e.involves(NodeId(4)));
        assert!(e.involves(NodeId(7)));
        assert!(!e.involves(NodeId(5)));
    }

    #[test]
    fn test_edge_type_wire_names() {
        assert_eq!(EdgeType::HasQuest.name(), "has_quest");
        assert_eq!(EdgeType::CanComplete.name(), "can_complete");
        assert_eq!(format!("{}", EdgeType::Owns), "owns");
    }
}

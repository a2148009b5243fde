//! Edge types for graphs.
//!
//! An edge routes the values produced by its source node to its target node.
//! Each edge owns exactly one payload slot during a forward pass, addressed
//! by its [`EdgeId`] (see [`Payloads`](crate::payload::Payloads)).

use crate::node::NodeId;
use core::fmt;

/// Unique identifier for an edge in the graph.
///
/// Edge IDs are arena indices assigned in insertion order. They double as the
/// index of the edge's payload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new edge ID.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge_{}", self.0)
    }
}

/// A directed edge: `from` -> `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Producing node.
    pub from: NodeId,
    /// Consuming node.
    pub to: NodeId,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(id: EdgeId, from: NodeId, to: NodeId) -> Self {
        Self { id, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_id_display() {
        assert_eq!(format!("{}", EdgeId::new(7)), "edge_7");
    }

    #[test]
    fn edge_endpoints() {
        let edge = Edge::new(EdgeId::new(0), NodeId::new(1), NodeId::new(2));
        assert_eq!(edge.from.index(), 1);
        assert_eq!(edge.to.index(), 2);
        assert_eq!(edge.id.index(), 0);
    }
}

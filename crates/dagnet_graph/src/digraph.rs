//! Insertion-ordered directed graph container.
//!
//! [`OrderedDiGraph`] stores named nodes with an arbitrary attribute type and
//! directed edges between them. Both nodes and each node's adjacency lists
//! keep the order in which they were added, so every query and the
//! topological order are deterministic for a given construction sequence.
//!
//! The container knows nothing about units, roles or payloads; it is the
//! structural substrate [`Graph`](crate::graph::Graph) builds on, and the
//! read-only view exported for external tooling.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::edge::{Edge, EdgeId};
use crate::graph::ValidationError;
use crate::node::NodeId;

#[derive(Debug)]
struct NodeEntry<N> {
    weight: N,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

/// A directed graph whose nodes are keyed by name and kept in insertion order.
///
/// # Example
///
/// ```
/// use dagnet_graph::digraph::OrderedDiGraph;
///
/// let mut graph = OrderedDiGraph::new();
/// graph.add_node("a", ());
/// graph.add_node("b", ());
/// graph.add_edge("a", "b").unwrap();
///
/// let order: Vec<_> = graph
///     .topological_order()
///     .unwrap()
///     .into_iter()
///     .filter_map(|id| graph.node_name(id))
///     .collect();
/// assert_eq!(order, ["a", "b"]);
/// ```
#[derive(Debug)]
pub struct OrderedDiGraph<N> {
    nodes: IndexMap<String, NodeEntry<N>>,
    edges: Vec<Edge>,
    lookup: HashMap<(NodeId, NodeId), EdgeId>,
}

impl<N> Default for OrderedDiGraph<N> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<N> OrderedDiGraph<N> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a node, or overwrites the attributes of an existing node with
    /// the same name.
    ///
    /// Overwriting keeps the node's position and its edges.
    pub fn add_node(&mut self, name: impl Into<String>, weight: N) -> NodeId {
        match self.nodes.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().weight = weight;
                NodeId(entry.index())
            }
            Entry::Vacant(entry) => {
                let id = NodeId(entry.index());
                entry.insert(NodeEntry {
                    weight,
                    incoming: Vec::new(),
                    outgoing: Vec::new(),
                });
                id
            }
        }
    }

    /// Inserts the edge `from -> to` between two existing nodes.
    ///
    /// Adding an edge that already exists returns its ID and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownNode`] if either endpoint is missing.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<EdgeId, ValidationError> {
        let from = self.require(from)?;
        let to = self.require(to)?;
        Ok(self.add_edge_between(from, to))
    }

    /// Inserts the edge `from -> to` by node ID. Both IDs must be valid.
    pub(crate) fn add_edge_between(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        if let Some(&existing) = self.lookup.get(&(from, to)) {
            return existing;
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(id, from, to));
        self.nodes[from.0].outgoing.push(id);
        self.nodes[to.0].incoming.push(id);
        self.lookup.insert((from, to), id);
        id
    }

    /// Removes the most recently added edges until `len` remain.
    pub(crate) fn truncate_edges(&mut self, len: usize) {
        while self.edges.len() > len {
            let Some(edge) = self.edges.pop() else {
                break;
            };
            // The newest edge is always last in both endpoint lists.
            self.nodes[edge.from.0].outgoing.pop();
            self.nodes[edge.to.0].incoming.pop();
            self.lookup.remove(&(edge.from, edge.to));
        }
    }

    /// Removes the most recently added node. It must have no edges left.
    pub(crate) fn pop_node(&mut self) -> Option<(String, N)> {
        let (_, last) = self.nodes.last()?;
        if !last.incoming.is_empty() || !last.outgoing.is_empty() {
            return None;
        }
        self.nodes.pop().map(|(name, entry)| (name, entry.weight))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if a node with this name exists.
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Looks up a node's ID by name.
    #[must_use]
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.get_index_of(name).map(NodeId)
    }

    /// Returns a node's name.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get_index(id.0).map(|(name, _)| name.as_str())
    }

    /// Returns a node's attributes.
    #[must_use]
    pub fn node_weight(&self, id: NodeId) -> Option<&N> {
        self.nodes.get_index(id.0).map(|(_, entry)| &entry.weight)
    }

    /// Returns a node's attributes mutably.
    pub fn node_weight_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes
            .get_index_mut(id.0)
            .map(|(_, entry)| &mut entry.weight)
    }

    /// Iterates over `(id, name, attributes)` in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &N)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, (name, entry))| (NodeId(index), name.as_str(), &entry.weight))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edge queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns all edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Gets an edge by ID.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Returns the ID of the edge `from -> to`, if present.
    #[must_use]
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.lookup.get(&(from, to)).copied()
    }

    /// Returns a node's incoming edges in the order they were added.
    ///
    /// Unknown IDs have no edges.
    #[must_use]
    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        self.nodes
            .get_index(id.0)
            .map_or(&[], |(_, entry)| entry.incoming.as_slice())
    }

    /// Returns a node's outgoing edges in the order they were added.
    ///
    /// Unknown IDs have no edges.
    #[must_use]
    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        self.nodes
            .get_index(id.0)
            .map_or(&[], |(_, entry)| entry.outgoing.as_slice())
    }

    /// Returns the number of incoming edges.
    #[must_use]
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.in_edges(id).len()
    }

    /// Returns the number of outgoing edges.
    #[must_use]
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out_edges(id).len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ordering
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns every node in an order where each edge's source precedes its
    /// target.
    ///
    /// Among nodes whose predecessors have all been emitted, the one inserted
    /// earliest goes first, which makes the order a pure function of the
    /// construction sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CyclicGraph`] if the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, ValidationError> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .values()
            .map(|entry| entry.incoming.len())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, degree)| *degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(index)) = ready.pop() {
            order.push(NodeId(index));
            for edge in &self.nodes[index].outgoing {
                let target = self.edges[edge.0].to.0;
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push(Reverse(target));
                }
            }
        }

        if order.len() != self.nodes.len() {
            let unresolved = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, degree)| *degree > 0)
                .filter_map(|(index, _)| self.node_name(NodeId(index)).map(str::to_owned))
                .collect();
            return Err(ValidationError::CyclicGraph { unresolved });
        }

        Ok(order)
    }

    /// Returns true if the graph has no cycles.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }

    fn require(&self, name: &str) -> Result<NodeId, ValidationError> {
        self.node_id(name)
            .ok_or_else(|| ValidationError::UnknownNode(name.to_owned()))
    }
}

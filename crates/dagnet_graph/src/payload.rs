//! Per-edge payload storage for a forward pass.
//!
//! During a call, every edge holds at most one in-flight value: written by the
//! edge's source node when it executes, consumed by the target node. The
//! values live in a side table indexed by [`EdgeId`] rather than on the graph
//! structure, so the structure stays immutable while a call runs.

use crate::edge::EdgeId;

/// Side table of in-flight edge values, one optional slot per edge.
///
/// A table is drained after every call, whether the call succeeded or not,
/// so no value leaks from one call into the next.
#[derive(Debug, Clone)]
pub struct Payloads<V> {
    slots: Vec<Option<V>>,
}

impl<V> Default for Payloads<V> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<V> Payloads<V> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with one empty slot per edge.
    #[must_use]
    pub fn with_edges(edge_count: usize) -> Self {
        let mut payloads = Self::new();
        payloads.prepare(edge_count);
        payloads
    }

    /// Empties the table and sizes it for `edge_count` edges.
    pub fn prepare(&mut self, edge_count: usize) {
        self.slots.clear();
        self.slots.resize_with(edge_count, || None);
    }

    /// Stores a value on an edge, returning any value it replaced.
    pub fn put(&mut self, edge: EdgeId, value: V) -> Option<V> {
        if edge.0 >= self.slots.len() {
            self.slots.resize_with(edge.0 + 1, || None);
        }
        self.slots[edge.0].replace(value)
    }

    /// Removes and returns the value on an edge.
    pub fn take(&mut self, edge: EdgeId) -> Option<V> {
        self.slots.get_mut(edge.0).and_then(Option::take)
    }

    /// Returns the value on an edge without consuming it.
    #[must_use]
    pub fn get(&self, edge: EdgeId) -> Option<&V> {
        self.slots.get(edge.0).and_then(Option::as_ref)
    }

    /// Returns true if the edge holds a value.
    #[must_use]
    pub fn is_occupied(&self, edge: EdgeId) -> bool {
        self.get(edge).is_some()
    }

    /// Returns the number of edges holding a value.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if no edge holds a value.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Drops every stored value, keeping the slots.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the table has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

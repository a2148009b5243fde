//! Lifecycle events emitted during a forward pass.
//!
//! All hooks receive `&GraphEvent` and match on variants for typed access.
//!
//! # Example
//!
//! ```
//! use dagnet_graph::hooks::events::GraphEvent;
//!
//! fn handle_event(event: &GraphEvent<'_>) {
//!     match event {
//!         GraphEvent::NodeStart { node_name, unit_name, .. } => {
//!             println!("running {node_name} ({unit_name})");
//!         }
//!         GraphEvent::GraphComplete { duration, .. } => {
//!             println!("forward pass took {duration:?}");
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use core::time::Duration;

use crate::executor::ExecutionError;
use crate::node::NodeId;

/// Identifies one [`GraphEvent`] variant, used to choose which events a hook
/// receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`GraphEvent::GraphStart`].
    GraphStart,
    /// See [`GraphEvent::GraphComplete`].
    GraphComplete,
    /// See [`GraphEvent::GraphFailure`].
    GraphFailure,
    /// See [`GraphEvent::NodeStart`].
    NodeStart,
    /// See [`GraphEvent::NodeComplete`].
    NodeComplete,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [EventKind; 5] = [
        EventKind::GraphStart,
        EventKind::GraphComplete,
        EventKind::GraphFailure,
        EventKind::NodeStart,
        EventKind::NodeComplete,
    ];

    /// Graph-level event kinds.
    pub const GRAPH: [EventKind; 3] = [
        EventKind::GraphStart,
        EventKind::GraphComplete,
        EventKind::GraphFailure,
    ];

    /// Node-level event kinds.
    pub const NODE: [EventKind; 2] = [EventKind::NodeStart, EventKind::NodeComplete];
}

/// Unified event enum for all forward-pass hooks.
#[derive(Debug, Clone, Copy)]
pub enum GraphEvent<'a> {
    // ─────────────────────────────────────────────────────────────────────────
    // Graph-Level Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted before validation, when a forward pass is entered.
    GraphStart {
        /// Number of positional inputs supplied by the caller.
        input_count: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// Emitted after the outputs have been drained.
    GraphComplete {
        /// Number of nodes whose unit ran, input nodes included.
        nodes_executed: usize,
        /// Total forward-pass duration.
        duration: Duration,
    },

    /// Emitted when a forward pass fails. Payloads are already cleared.
    GraphFailure {
        /// The error returned to the caller.
        error: &'a ExecutionError,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Node Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted before a node's unit runs.
    NodeStart {
        /// The node's ID.
        node_id: NodeId,
        /// The node's name.
        node_name: &'a str,
        /// The attached unit's name.
        unit_name: &'static str,
    },

    /// Emitted after a node's outputs have been written to its out-edges.
    NodeComplete {
        /// The node's ID.
        node_id: NodeId,
        /// The node's name.
        node_name: &'a str,
        /// Number of values the unit produced.
        produced: usize,
        /// Whether a single value was replicated onto several out-edges.
        broadcast: bool,
        /// How long the unit took to run.
        duration: Duration,
    },
}

impl GraphEvent<'_> {
    /// Returns this event's kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GraphEvent::GraphStart { .. } => EventKind::GraphStart,
            GraphEvent::GraphComplete { .. } => EventKind::GraphComplete,
            GraphEvent::GraphFailure { .. } => EventKind::GraphFailure,
            GraphEvent::NodeStart { .. } => EventKind::NodeStart,
            GraphEvent::NodeComplete { .. } => EventKind::NodeComplete,
        }
    }

    /// Returns the node name for node-level events.
    #[must_use]
    pub fn node_name(&self) -> Option<&str> {
        match self {
            GraphEvent::NodeStart { node_name, .. } | GraphEvent::NodeComplete { node_name, .. } => {
                Some(node_name)
            }
            _ => None,
        }
    }
}

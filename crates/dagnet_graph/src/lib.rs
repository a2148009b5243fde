//! Graph construction and execution primitives for dagnet (Layer 2).
//!
//! `dagnet_graph` assembles [units](dagnet_unit::Unit) into a directed
//! acyclic graph of named nodes and runs the whole assembly as one callable
//! with a fixed ordered set of inputs and outputs.
//!
//! # Core Concepts
//!
//! - [`OrderedDiGraph`](digraph::OrderedDiGraph) - Insertion-ordered directed graph container
//! - [`Graph`] - Node registry and structural validator with a builder API
//! - [`GraphExecutor`] - Topological execution engine
//! - [`Payloads`](payload::Payloads) - Per-edge values of one forward pass
//! - [`HooksAPI`](hooks::HooksAPI) - Lifecycle observers
//!
//! # Example
//!
//! ```
//! use dagnet_graph::Graph;
//! use dagnet_unit::Output;
//!
//! fn double(inputs: Vec<i32>) -> Output<i32> {
//!     Output::Single(inputs[0] * 2)
//! }
//!
//! let mut graph = Graph::<i32>::new();
//! graph
//!     .add_input_node("x")?
//!     .add_node("a", double, &["x"])?
//!     .add_node("b", double, &["x"])?
//!     .add_output_node("y", &["a", "b"])?;
//!
//! let result = graph.forward(vec![2])?;
//! assert_eq!(result.into_single(), Some(Output::Many(vec![4, 4])));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`dagnet_unit`): the unit contract (Unit, Output, `IntoUnit`)
//! - **Layer 2** (`dagnet_graph`): graph construction and execution (this crate)
//! - **Layer 3** (`dagnet_core_plugins`): tracing setup and event logging

/// Insertion-ordered directed graph container.
pub mod digraph;

/// Edge identifiers and records.
pub mod edge;

/// Forward-pass execution engine.
pub mod executor;

/// Node registry, builder API and structural validation.
pub mod graph;

/// Lifecycle hooks for forward passes.
pub mod hooks;

/// Node identifiers, roles and attributes.
pub mod node;

/// Per-edge payload storage.
pub mod payload;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::digraph::OrderedDiGraph;
    pub use crate::edge::{Edge, EdgeId};
    pub use crate::executor::{ExecutionError, GraphExecutor};
    pub use crate::graph::{Graph, ValidationError};
    pub use crate::hooks::{EventKind, GraphEvent, HookRegistrationError, HooksAPI};
    pub use crate::node::{GraphNode, NodeId, Role};
    pub use crate::payload::Payloads;
}

// Re-export key types at crate root for convenience
pub use executor::{ExecutionError, GraphExecutor};
pub use graph::{Graph, ValidationError};
pub use node::{NodeId, Role};
pub use payload::Payloads;

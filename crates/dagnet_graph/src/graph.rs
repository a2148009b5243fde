//! Graph structure, construction API and structural validation.
//!
//! A [`Graph`] is an insertion-ordered DAG of named nodes. Each node has a
//! [`Role`]: input nodes receive the positional arguments of a call, output
//! nodes supply its positional results, and plain nodes run an attached unit
//! on the payloads of their in-edges.
//!
//! Every construction call is atomic: if it fails, the graph is left exactly
//! as it was before the call. After every successful call the graph is a DAG
//! whose declared inputs are sources and whose declared outputs are sinks.
//!
//! # Example
//!
//! ```
//! use dagnet_graph::Graph;
//! use dagnet_unit::Output;
//!
//! let mut graph = Graph::<i32>::new();
//! graph
//!     .add_input_node("x")?
//!     .add_node("inc", |v: Vec<i32>| Output::Single(v[0] + 1), &["x"])?
//!     .add_output_node("y", &["inc"])?;
//!
//! assert_eq!(graph.input_nodes(), ["x"]);
//! assert_eq!(graph.forward(vec![1])?, Output::Single(Output::Single(2)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::fmt;

use dagnet_unit::{BoxedUnit, IntoUnit, Output, UnitError};

use crate::digraph::OrderedDiGraph;
use crate::node::{GraphNode, NodeId, Role};

/// A directed acyclic graph of named computational units.
///
/// The order in which input and output nodes are registered defines the call
/// signature: the k-th argument feeds the k-th input node and the k-th result
/// comes from the k-th output node.
pub struct Graph<V> {
    /// Nodes, edges and per-node attributes.
    structure: OrderedDiGraph<GraphNode<V>>,
    /// Input nodes in registration order.
    inputs: Vec<NodeId>,
    /// Output nodes in registration order.
    outputs: Vec<NodeId>,
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self {
            structure: OrderedDiGraph::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl<V: 'static> Graph<V> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an existing ordered digraph.
    ///
    /// Input and output nodes are recovered from each node's [`Role`], in
    /// the digraph's insertion order, so they define the call signature the
    /// same way registration order does.
    ///
    /// # Errors
    ///
    /// Returns the first violation reported by
    /// [`check_structure`](Self::check_structure).
    pub fn from_structure(structure: OrderedDiGraph<GraphNode<V>>) -> Result<Self, ValidationError> {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for (id, _, node) in structure.nodes() {
            match node.role() {
                Role::Input => inputs.push(id),
                Role::Output => outputs.push(id),
                Role::Plain => {}
            }
        }

        let graph = Self {
            structure,
            inputs,
            outputs,
        };
        graph.check_structure()?;
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph adopted from structure"
        );
        Ok(graph)
    }

    /// Consumes the graph, returning its underlying digraph.
    #[must_use]
    pub fn into_structure(self) -> OrderedDiGraph<GraphNode<V>> {
        self.structure
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers an input node carrying a pass-through unit.
    ///
    /// Re-adding an existing input node is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateNode`] if the name is already used
    /// by a node with another role.
    pub fn add_input_node(&mut self, name: &str) -> Result<&mut Self, ValidationError> {
        self.register(name, GraphNode::input(), &[])
    }

    /// Registers an output node fed by each node in `previous`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateNode`] on a role conflict,
    /// [`ValidationError::UnknownNode`] if a predecessor does not exist, or a
    /// structural error if the new edges break the graph's invariants.
    pub fn add_output_node(
        &mut self,
        name: &str,
        previous: &[&str],
    ) -> Result<&mut Self, ValidationError> {
        self.register(name, GraphNode::output(), previous)
    }

    /// Registers a plain node running `unit`, fed by each node in `previous`.
    ///
    /// Re-adding an existing plain node replaces its unit and adds any new
    /// edges; edges it already has are kept.
    ///
    /// # Errors
    ///
    /// Same as [`add_output_node`](Self::add_output_node).
    pub fn add_node<M>(
        &mut self,
        name: &str,
        unit: impl IntoUnit<V, M>,
        previous: &[&str],
    ) -> Result<&mut Self, ValidationError> {
        self.add_boxed_node(name, unit.into_boxed_unit(), previous)
    }

    /// Registers a plain node running an already boxed unit.
    ///
    /// # Errors
    ///
    /// Same as [`add_output_node`](Self::add_output_node).
    pub fn add_boxed_node(
        &mut self,
        name: &str,
        unit: BoxedUnit<V>,
        previous: &[&str],
    ) -> Result<&mut Self, ValidationError> {
        self.register(name, GraphNode::plain(unit), previous)
    }

    /// Adds the edge `from -> to` between two registered nodes.
    ///
    /// Adding an existing edge again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownNode`] if an endpoint is missing, or a
    /// structural error if the edge would create a cycle, give an output node
    /// a successor, or give an input node a predecessor. A rejected edge is
    /// not kept.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<&mut Self, ValidationError> {
        let mark = self.structure.edge_count();
        self.structure.add_edge(from, to)?;
        if let Err(err) = self.check_structure() {
            self.structure.truncate_edges(mark);
            return Err(err);
        }
        tracing::trace!(from, to, "added edge");
        Ok(self)
    }

    fn register(
        &mut self,
        name: &str,
        node: GraphNode<V>,
        previous: &[&str],
    ) -> Result<&mut Self, ValidationError> {
        let requested = node.role();
        let existing = self.structure.node_id(name);
        if let Some(id) = existing
            && let Some(role) = self.role_at(id)
            && role != requested
        {
            return Err(ValidationError::DuplicateNode {
                name: name.to_owned(),
                existing: role,
                requested,
            });
        }

        let mark = self.structure.edge_count();
        let (id, pending) = match existing {
            Some(id) => (id, Some(node)),
            None => {
                let id = self.structure.add_node(name, node);
                match requested {
                    Role::Input => self.inputs.push(id),
                    Role::Output => self.outputs.push(id),
                    Role::Plain => {}
                }
                (id, None)
            }
        };

        if let Err(err) = self.connect(previous, id) {
            self.structure.truncate_edges(mark);
            if existing.is_none() {
                self.forget_last_node(requested);
            }
            return Err(err);
        }

        // A re-registered node only takes its new attributes once the call
        // can no longer fail.
        if let Some(node) = pending {
            self.structure.add_node(name, node);
        }

        tracing::debug!(node = name, role = %requested, predecessors = previous.len(), "registered node");
        Ok(self)
    }

    fn connect(&mut self, previous: &[&str], to: NodeId) -> Result<(), ValidationError> {
        if previous.is_empty() {
            return Ok(());
        }
        for name in previous {
            let from = self
                .structure
                .node_id(name)
                .ok_or_else(|| ValidationError::UnknownNode((*name).to_owned()))?;
            self.structure.add_edge_between(from, to);
        }
        self.check_structure()
    }

    fn forget_last_node(&mut self, role: Role) {
        self.structure.pop_node();
        match role {
            Role::Input => {
                self.inputs.pop();
            }
            Role::Output => {
                self.outputs.pop();
            }
            Role::Plain => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true if a node with this name exists.
    #[must_use]
    pub fn is_node_in_graph(&self, name: &str) -> bool {
        self.structure.contains_node(name)
    }

    /// Returns true if the node has no incoming edges.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownNode`] if the node does not exist.
    pub fn is_source_node(&self, name: &str) -> Result<bool, ValidationError> {
        let id = self.require(name)?;
        Ok(self.structure.in_degree(id) == 0)
    }

    /// Returns true if the node has no outgoing edges.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownNode`] if the node does not exist.
    pub fn is_sink_node(&self, name: &str) -> Result<bool, ValidationError> {
        let id = self.require(name)?;
        Ok(self.structure.out_degree(id) == 0)
    }

    /// Returns the role of a node, if it exists.
    #[must_use]
    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.structure.node_id(name).and_then(|id| self.role_at(id))
    }

    /// Returns the input node names in registration order.
    #[must_use]
    pub fn input_nodes(&self) -> Vec<&str> {
        self.names_of(&self.inputs)
    }

    /// Returns the output node names in registration order.
    #[must_use]
    pub fn output_nodes(&self) -> Vec<&str> {
        self.names_of(&self.outputs)
    }

    /// Iterates over all node names in insertion order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.structure.nodes().map(|(_, name, _)| name)
    }

    /// Iterates over all edges as `(from, to)` name pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.structure.edges().iter().filter_map(|edge| {
            Some((
                self.structure.node_name(edge.from)?,
                self.structure.node_name(edge.to)?,
            ))
        })
    }

    /// Returns every node name in the order a forward pass visits them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CyclicGraph`] if the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<&str>, ValidationError> {
        let order = self.structure.topological_order()?;
        Ok(self.names_of(&order))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.structure.node_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.structure.edge_count()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Returns a read-only view of the underlying directed graph.
    #[must_use]
    pub fn structure(&self) -> &OrderedDiGraph<GraphNode<V>> {
        &self.structure
    }

    /// Runs `f` against the underlying directed graph and returns its result.
    ///
    /// Intended for external tooling such as renderers and analyzers.
    pub fn apply_on_graph<R>(&self, f: impl FnOnce(&OrderedDiGraph<GraphNode<V>>) -> R) -> R {
        f(&self.structure)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true if the graph is a DAG whose declared outputs are sinks and
    /// whose declared inputs are sources.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check_structure().is_ok()
    }

    /// The predicate behind [`is_valid`](Self::is_valid), reporting the first
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CyclicGraph`],
    /// [`ValidationError::DisconnectedOutput`] or
    /// [`ValidationError::DisconnectedInput`].
    pub fn check_structure(&self) -> Result<(), ValidationError> {
        self.structure.topological_order()?;
        for &id in &self.outputs {
            if self.structure.out_degree(id) > 0 {
                return Err(ValidationError::DisconnectedOutput(self.owned_name(id)));
            }
        }
        for &id in &self.inputs {
            if self.structure.in_degree(id) > 0 {
                return Err(ValidationError::DisconnectedInput(self.owned_name(id)));
            }
        }
        Ok(())
    }

    /// Validates the graph for execution, collecting every problem.
    ///
    /// On top of [`check_structure`](Self::check_structure) this demands that
    /// every output node has a producer and every input node a consumer. A
    /// cycle is reported alone, since degree checks mean little without a DAG.
    ///
    /// # Errors
    ///
    /// Returns all validation errors found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors = self.problems(false);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates the graph for execution, failing on the first problem.
    ///
    /// # Errors
    ///
    /// Returns the first error [`validate`](Self::validate) would report.
    pub fn assert_valid(&self) -> Result<(), ValidationError> {
        match self.problems(true).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn problems(&self, first_only: bool) -> Vec<ValidationError> {
        if let Err(err) = self.structure.topological_order() {
            return vec![err];
        }

        let mut errors = Vec::new();
        for &id in &self.outputs {
            if self.structure.out_degree(id) > 0 {
                errors.push(ValidationError::DisconnectedOutput(self.owned_name(id)));
            }
            if self.structure.in_degree(id) == 0 {
                errors.push(ValidationError::UnconnectedOutput(self.owned_name(id)));
            }
            if first_only && !errors.is_empty() {
                return errors;
            }
        }
        for &id in &self.inputs {
            if self.structure.in_degree(id) > 0 {
                errors.push(ValidationError::DisconnectedInput(self.owned_name(id)));
            }
            if self.structure.out_degree(id) == 0 {
                errors.push(ValidationError::UnconnectedInput(self.owned_name(id)));
            }
            if first_only && !errors.is_empty() {
                return errors;
            }
        }
        errors
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Engine access
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn input_ids(&self) -> &[NodeId] {
        &self.inputs
    }

    pub(crate) fn output_ids(&self) -> &[NodeId] {
        &self.outputs
    }

    pub(crate) fn role_at(&self, id: NodeId) -> Option<Role> {
        self.structure.node_weight(id).map(GraphNode::role)
    }

    pub(crate) fn name_at(&self, id: NodeId) -> &str {
        self.structure.node_name(id).unwrap_or_default()
    }

    pub(crate) fn unit_name_at(&self, id: NodeId) -> &'static str {
        self.structure
            .node_weight(id)
            .and_then(GraphNode::unit_name)
            .unwrap_or_default()
    }

    pub(crate) fn run_unit(
        &mut self,
        id: NodeId,
        inputs: Vec<V>,
    ) -> Option<Result<Output<V>, UnitError>> {
        self.structure
            .node_weight_mut(id)
            .and_then(|node| node.run_unit(inputs))
    }

    pub(crate) fn require(&self, name: &str) -> Result<NodeId, ValidationError> {
        self.structure
            .node_id(name)
            .ok_or_else(|| ValidationError::UnknownNode(name.to_owned()))
    }

    fn names_of(&self, ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|&id| self.name_at(id)).collect()
    }

    fn owned_name(&self, id: NodeId) -> String {
        self.name_at(id).to_owned()
    }
}

impl<V: 'static> fmt::Debug for Graph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_names().collect::<Vec<_>>())
            .field("edges", &self.edges().collect::<Vec<_>>())
            .field("inputs", &self.input_nodes())
            .field("outputs", &self.output_nodes())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ValidationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while building or validating a graph.
///
/// Construction calls raise these at the point a problem is introduced; a
/// forward pass raises them (wrapped in
/// [`ExecutionError::Invalid`](crate::executor::ExecutionError::Invalid))
/// before any node runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A referenced node does not exist.
    UnknownNode(String),
    /// A name was registered again with a different role.
    DuplicateNode {
        /// The node name.
        name: String,
        /// The role the node already has.
        existing: Role,
        /// The role that was requested.
        requested: Role,
    },
    /// The graph contains a cycle.
    CyclicGraph {
        /// Nodes that could not be ordered, in insertion order.
        unresolved: Vec<String>,
    },
    /// An output node has outgoing edges.
    DisconnectedOutput(String),
    /// An output node has no incoming edges.
    UnconnectedOutput(String),
    /// An input node has incoming edges.
    DisconnectedInput(String),
    /// An input node has no outgoing edges.
    UnconnectedInput(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownNode(name) => write!(f, "unknown node: '{name}'"),
            ValidationError::DuplicateNode {
                name,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "node '{name}' is already {existing}, cannot register it as {requested}"
                )
            }
            ValidationError::CyclicGraph { unresolved } => {
                write!(
                    f,
                    "graph is not a DAG (unresolved nodes: {})",
                    unresolved.join(", ")
                )
            }
            ValidationError::DisconnectedOutput(name) => {
                write!(f, "output node '{name}' is not a sink")
            }
            ValidationError::UnconnectedOutput(name) => {
                write!(
                    f,
                    "output node '{name}' is a source node, make sure it's connected"
                )
            }
            ValidationError::DisconnectedInput(name) => {
                write!(f, "input node '{name}' is not a source")
            }
            ValidationError::UnconnectedInput(name) => {
                write!(
                    f,
                    "input node '{name}' is a sink node, make sure it's connected"
                )
            }
        }
    }
}

impl core::error::Error for ValidationError {}

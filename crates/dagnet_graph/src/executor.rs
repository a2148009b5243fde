//! Topological execution engine.
//!
//! The [`GraphExecutor`] runs a forward pass over a [`Graph`] in three phases:
//!
//! 1. **Seeding**: validate the graph, check the argument count, and run each
//!    input node on its positional argument.
//! 2. **Executing**: run every plain node once, in stable topological order,
//!    on the payloads of its in-edges.
//! 3. **Draining**: read the payloads reaching each output node, in output
//!    registration order, then clear every payload.
//!
//! Payloads live in a [`Payloads`] side table owned by the call. It is
//! cleared on success and on every failure, so a graph is reusable after any
//! call.
//!
//! # Example
//!
//! ```
//! use dagnet_graph::{Graph, GraphExecutor};
//! use dagnet_unit::Output;
//!
//! let mut graph = Graph::<i32>::new();
//! graph
//!     .add_input_node("x")?
//!     .add_node("n1", |v: Vec<i32>| Output::Single(v[0] + 1), &["x"])?
//!     .add_node("n2", |v: Vec<i32>| Output::Single(v[0] * 3), &["n1"])?
//!     .add_output_node("y", &["n2"])?;
//!
//! let result = GraphExecutor::new().execute(&mut graph, vec![1])?;
//! assert_eq!(result, Output::Single(Output::Single(6)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::fmt;
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

use dagnet_unit::{Output, Unit, UnitError};

use crate::edge::EdgeId;
use crate::graph::{Graph, ValidationError};
use crate::hooks::{GraphEvent, HooksAPI};
use crate::node::{NodeId, Role};
use crate::payload::Payloads;

/// Errors that can occur during a forward pass.
#[derive(Debug)]
pub enum ExecutionError {
    /// The graph failed pre-flight validation.
    Invalid(ValidationError),
    /// The number of arguments differs from the number of input nodes.
    ArityMismatch {
        /// Number of input nodes.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },
    /// A source node was executed without an external input.
    MissingInput(String),
    /// A unit produced a number of values its node cannot route.
    OutputArityMismatch {
        /// The node name.
        node: String,
        /// Number of values the unit produced.
        produced: usize,
        /// The node's out-degree.
        expected: usize,
    },
    /// A unit returned an error.
    UnitFailed {
        /// The node name.
        node: String,
        /// The unit's error.
        source: UnitError,
    },
    /// A node ran before one of its producers.
    MissingPayload {
        /// The consuming node name.
        node: String,
        /// The empty in-edge.
        edge: EdgeId,
    },
    /// An output node was asked to execute. Output nodes are drained instead.
    NotExecutable(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Invalid(err) => write!(f, "{err}"),
            ExecutionError::ArityMismatch { expected, got } => {
                write!(
                    f,
                    "was expecting {expected} argument(s) for as many input nodes, got {got}"
                )
            }
            ExecutionError::MissingInput(node) => {
                write!(f, "node '{node}' did not get an input but is a source node")
            }
            ExecutionError::OutputArityMismatch {
                node,
                produced,
                expected,
            } => {
                write!(
                    f,
                    "number of outputs from the unit ({produced}) does not match the number of out-edges ({expected}) for node '{node}'"
                )
            }
            ExecutionError::UnitFailed { node, source } => {
                write!(f, "unit of node '{node}' failed: {source}")
            }
            ExecutionError::MissingPayload { node, edge } => {
                write!(
                    f,
                    "node '{node}' found no payload on {edge}, its producer has not run"
                )
            }
            ExecutionError::NotExecutable(node) => {
                write!(f, "output node '{node}' has no unit to execute")
            }
        }
    }
}

impl core::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ExecutionError::UnitFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for ExecutionError {
    fn from(err: ValidationError) -> Self {
        ExecutionError::Invalid(err)
    }
}

/// Forward-pass engine.
///
/// The executor itself holds only configuration; every call brings its own
/// payload table. A graph is borrowed mutably for the whole pass, which rules
/// out concurrent passes over the same graph.
#[derive(Debug, Clone, Default)]
pub struct GraphExecutor {
    /// Observers notified at each lifecycle point.
    hooks: Option<Arc<HooksAPI>>,
}

impl GraphExecutor {
    /// Creates an executor with no hooks.
    ///
    /// Every pass starts with [`Graph::assert_valid`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a hook registry.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<HooksAPI>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Returns the attached hook registry, if any.
    #[must_use]
    pub fn hooks(&self) -> Option<&Arc<HooksAPI>> {
        self.hooks.as_ref()
    }

    /// Runs a forward pass with a fresh payload table.
    ///
    /// Returns one entry per output node (`Single` if there is exactly one),
    /// each holding the values on that node's in-edges (`Single` if it has
    /// exactly one producer).
    ///
    /// # Errors
    ///
    /// Returns the first [`ExecutionError`] encountered. No partial result is
    /// produced.
    pub fn execute<V: Clone + 'static>(
        &self,
        graph: &mut Graph<V>,
        inputs: Vec<V>,
    ) -> Result<Output<Output<V>>, ExecutionError> {
        let mut payloads = Payloads::new();
        self.execute_in(graph, &mut payloads, inputs)
    }

    /// Runs a forward pass using a caller-owned payload table.
    ///
    /// The table is resized for the graph before seeding and is drained when
    /// the call returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn execute_in<V: Clone + 'static>(
        &self,
        graph: &mut Graph<V>,
        payloads: &mut Payloads<V>,
        inputs: Vec<V>,
    ) -> Result<Output<Output<V>>, ExecutionError> {
        let span = tracing::debug_span!(
            "forward",
            nodes = graph.node_count(),
            inputs = inputs.len()
        );
        let _enter = span.enter();
        let start = Instant::now();

        self.emit(&GraphEvent::GraphStart {
            input_count: inputs.len(),
            node_count: graph.node_count(),
        });

        payloads.prepare(graph.edge_count());
        let mut nodes_executed = 0;
        let result = self.run(graph, payloads, inputs, &mut nodes_executed);
        payloads.clear();

        match &result {
            Ok(_) => {
                let duration = start.elapsed();
                tracing::debug!(nodes_executed, ?duration, "forward pass complete");
                self.emit(&GraphEvent::GraphComplete {
                    nodes_executed,
                    duration,
                });
            }
            Err(error) => {
                tracing::warn!(%error, nodes_executed, "forward pass failed");
                self.emit(&GraphEvent::GraphFailure { error });
            }
        }
        result
    }

    /// Executes a single node and routes its result onto its out-edges.
    ///
    /// With `input`, the value is the node's sole input, passed as is. Without
    /// it, the node consumes the payloads on its in-edges in the order those
    /// edges were added. Returns the unit's result before normalization.
    ///
    /// This is the building block of a forward pass, exposed for inspection
    /// and testing. The payload table is not cleared afterwards.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnknownNode`] (wrapped) if the node does not exist
    /// - [`ExecutionError::NotExecutable`] for an output node
    /// - [`ExecutionError::MissingInput`] for a source node without `input`
    /// - [`ExecutionError::MissingPayload`] if a producer has not run
    /// - [`ExecutionError::UnitFailed`] if the unit fails
    /// - [`ExecutionError::OutputArityMismatch`] if the result cannot be routed
    pub fn forward_through_node<V: Clone + 'static>(
        &self,
        graph: &mut Graph<V>,
        payloads: &mut Payloads<V>,
        name: &str,
        input: Option<V>,
    ) -> Result<Output<V>, ExecutionError> {
        let id = graph.require(name)?;
        let (output, elapsed) = self.execute_node(graph, payloads, id, input)?;
        let result = output.clone();
        self.route(graph, payloads, id, output, elapsed)?;
        Ok(result)
    }

    fn run<V: Clone + 'static>(
        &self,
        graph: &mut Graph<V>,
        payloads: &mut Payloads<V>,
        inputs: Vec<V>,
        nodes_executed: &mut usize,
    ) -> Result<Output<Output<V>>, ExecutionError> {
        graph.assert_valid()?;

        // Seeding
        let input_ids = graph.input_ids().to_vec();
        if inputs.len() != input_ids.len() {
            return Err(ExecutionError::ArityMismatch {
                expected: input_ids.len(),
                got: inputs.len(),
            });
        }
        for (id, value) in input_ids.into_iter().zip(inputs) {
            let (output, elapsed) = self.execute_node(graph, payloads, id, Some(value))?;
            self.route(graph, payloads, id, output, elapsed)?;
            *nodes_executed += 1;
        }

        // Executing
        let order = graph.structure().topological_order()?;
        for id in order {
            if graph.role_at(id) != Some(Role::Plain) {
                continue;
            }
            let (output, elapsed) = self.execute_node(graph, payloads, id, None)?;
            self.route(graph, payloads, id, output, elapsed)?;
            *nodes_executed += 1;
        }

        // Draining
        let mut results = Vec::with_capacity(graph.output_ids().len());
        for &id in graph.output_ids() {
            let values = Self::consume(graph, payloads, id)?;
            results.push(Output::from_vec(values));
        }
        Ok(Output::from_vec(results))
    }

    /// Gathers a node's inputs and runs its unit.
    fn execute_node<V: 'static>(
        &self,
        graph: &mut Graph<V>,
        payloads: &mut Payloads<V>,
        id: NodeId,
        external: Option<V>,
    ) -> Result<(Output<V>, Duration), ExecutionError> {
        if graph.role_at(id) == Some(Role::Output) {
            return Err(ExecutionError::NotExecutable(graph.name_at(id).to_owned()));
        }

        let inputs = match external {
            Some(value) => vec![value],
            None => {
                if graph.structure().in_degree(id) == 0 {
                    return Err(ExecutionError::MissingInput(graph.name_at(id).to_owned()));
                }
                Self::consume(graph, payloads, id)?
            }
        };

        let unit_name = graph.unit_name_at(id);
        tracing::trace!(
            node = graph.name_at(id),
            unit = unit_name,
            inputs = inputs.len(),
            "running node"
        );
        self.emit(&GraphEvent::NodeStart {
            node_id: id,
            node_name: graph.name_at(id),
            unit_name,
        });

        let start = Instant::now();
        let output = graph
            .run_unit(id, inputs)
            .ok_or_else(|| ExecutionError::NotExecutable(graph.name_at(id).to_owned()))?
            .map_err(|source| ExecutionError::UnitFailed {
                node: graph.name_at(id).to_owned(),
                source,
            })?;
        Ok((output, start.elapsed()))
    }

    /// Takes the payloads on a node's in-edges, in edge order.
    fn consume<V>(
        graph: &Graph<V>,
        payloads: &mut Payloads<V>,
        id: NodeId,
    ) -> Result<Vec<V>, ExecutionError>
    where
        V: 'static,
    {
        graph
            .structure()
            .in_edges(id)
            .iter()
            .map(|&edge| {
                payloads
                    .take(edge)
                    .ok_or_else(|| ExecutionError::MissingPayload {
                        node: graph.name_at(id).to_owned(),
                        edge,
                    })
            })
            .collect()
    }

    /// Writes a unit's result onto the node's out-edges.
    ///
    /// A single value meeting several out-edges is replicated onto all of
    /// them. Otherwise the value count must equal the out-degree, and nothing
    /// is written if it does not. A sink discards its result.
    fn route<V: Clone + 'static>(
        &self,
        graph: &Graph<V>,
        payloads: &mut Payloads<V>,
        id: NodeId,
        output: Output<V>,
        elapsed: Duration,
    ) -> Result<(), ExecutionError> {
        let out_edges = graph.structure().out_edges(id);
        let produced = output.len();
        let mut values = output.into_vec();
        let mut broadcast = false;

        if out_edges.is_empty() {
            tracing::trace!(node = graph.name_at(id), produced, "sink result discarded");
        } else if values.len() == 1
            && let Some((&last, rest)) = out_edges.split_last()
            && !rest.is_empty()
            && let Some(value) = values.pop()
        {
            for &edge in rest {
                payloads.put(edge, value.clone());
            }
            payloads.put(last, value);
            broadcast = true;
        } else if values.len() == out_edges.len() {
            for (&edge, value) in out_edges.iter().zip(values) {
                payloads.put(edge, value);
            }
        } else {
            return Err(ExecutionError::OutputArityMismatch {
                node: graph.name_at(id).to_owned(),
                produced,
                expected: out_edges.len(),
            });
        }

        self.emit(&GraphEvent::NodeComplete {
            node_id: id,
            node_name: graph.name_at(id),
            produced,
            broadcast,
            duration: elapsed,
        });
        Ok(())
    }

    fn emit(&self, event: &GraphEvent<'_>) {
        if let Some(hooks) = &self.hooks {
            hooks.invoke(event);
        }
    }
}

impl<V: Clone + 'static> Graph<V> {
    /// Runs a forward pass with a default [`GraphExecutor`].
    ///
    /// # Errors
    ///
    /// See [`GraphExecutor::execute`].
    pub fn forward(&mut self, inputs: Vec<V>) -> Result<Output<Output<V>>, ExecutionError> {
        GraphExecutor::new().execute(self, inputs)
    }
}

/// A graph is itself a unit, so it can be nested as a node of another graph.
///
/// The nested graph's results are flattened: output nodes in order, each
/// contributing the values on its in-edges.
impl<V: Clone + 'static> Unit<V> for Graph<V> {
    fn forward(&mut self, inputs: Vec<V>) -> Result<Output<V>, UnitError> {
        GraphExecutor::new()
            .execute(self, inputs)
            .map(|outputs| outputs.flatten())
            .map_err(UnitError::other)
    }

    fn name(&self) -> &'static str {
        "graph"
    }
}

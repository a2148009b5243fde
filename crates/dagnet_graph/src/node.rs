//! Node types for graphs.
//!
//! Nodes are the named vertices of a graph. Each node carries a [`Role`] that
//! is fixed when the node is created, and (except for output nodes) the unit
//! that runs when the node executes.

use core::fmt;

use dagnet_unit::{BoxedUnit, Identity, Output, UnitError};

/// Unique identifier for a node in the graph.
///
/// Node IDs are arena indices assigned in insertion order, so comparing two
/// IDs compares the order in which the nodes were first registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new node ID.
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// The part a node plays in the graph's call interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// An interior node running an attached unit.
    Plain,
    /// Receives one positional argument of the call. Must be a source.
    Input,
    /// Supplies one positional result of the call. Must be a sink.
    Output,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Plain => write!(f, "a plain node"),
            Role::Input => write!(f, "an input node"),
            Role::Output => write!(f, "an output node"),
        }
    }
}

/// Per-node attributes stored in the graph structure.
///
/// Output nodes have no unit: the engine reads their in-edge payloads
/// directly instead of executing them.
pub struct GraphNode<V> {
    role: Role,
    unit: Option<BoxedUnit<V>>,
}

impl<V: 'static> GraphNode<V> {
    /// Creates an input node carrying an [`Identity`] unit.
    #[must_use]
    pub fn input() -> Self {
        Self {
            role: Role::Input,
            unit: Some(Box::new(Identity)),
        }
    }

    /// Creates an output node.
    #[must_use]
    pub fn output() -> Self {
        Self {
            role: Role::Output,
            unit: None,
        }
    }

    /// Creates a plain node running `unit`.
    #[must_use]
    pub fn plain(unit: BoxedUnit<V>) -> Self {
        Self {
            role: Role::Plain,
            unit: Some(unit),
        }
    }

    /// Returns the node's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the attached unit's name, if the node has a unit.
    #[must_use]
    pub fn unit_name(&self) -> Option<&'static str> {
        self.unit.as_ref().map(|unit| unit.name())
    }

    /// Runs the attached unit, or returns `None` if there is none.
    pub(crate) fn run_unit(&mut self, inputs: Vec<V>) -> Option<Result<Output<V>, UnitError>> {
        self.unit.as_mut().map(|unit| unit.forward(inputs))
    }
}

impl<V: 'static> fmt::Debug for GraphNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("role", &self.role)
            .field("unit", &self.unit_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagnet_unit::IntoUnit;

    fn halve(inputs: Vec<f64>) -> Output<f64> {
        Output::Single(inputs[0] / 2.0)
    }

    #[test]
    fn node_id_display() {
        let id = NodeId::new(42);
        assert_eq!(format!("{id}"), "node_42");
    }

    #[test]
    fn node_id_orders_by_insertion() {
        assert!(NodeId::new(1) < NodeId::new(2));
        assert_eq!(NodeId::new(3), NodeId::new(3));
    }

    #[test]
    fn input_node_passes_through() {
        let mut node = GraphNode::<i32>::input();
        assert_eq!(node.role(), Role::Input);
        assert_eq!(node.unit_name(), Some("identity"));
        assert_eq!(node.run_unit(vec![5]).unwrap().unwrap(), Output::Single(5));
    }

    #[test]
    fn output_node_has_no_unit() {
        let mut node = GraphNode::<i32>::output();
        assert_eq!(node.role(), Role::Output);
        assert!(node.unit_name().is_none());
        assert!(node.run_unit(vec![1]).is_none());
    }

    #[test]
    fn plain_node_runs_unit() {
        let mut node = GraphNode::plain(halve.into_boxed_unit());
        assert_eq!(node.role(), Role::Plain);
        assert!(node.unit_name().unwrap().contains("halve"));
        assert_eq!(
            node.run_unit(vec![3.0]).unwrap().unwrap(),
            Output::Single(1.5)
        );
    }

    #[test]
    fn graph_node_debug() {
        let node = GraphNode::<i32>::input();
        let debug_str = format!("{node:?}");
        assert!(debug_str.contains("GraphNode"));
        assert!(debug_str.contains("Input"));
        assert!(debug_str.contains("identity"));
    }
}

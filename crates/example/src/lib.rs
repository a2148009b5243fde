//! Naive inception module built with dagnet.
//!
//! Three parallel branches read the same input features, each applies its
//! own affine map followed by an ELU, and a concatenation node joins them:
//!
//! ```text
//!              ┌──────────┐
//!          ┌──▶│ branch_a │───┐
//!          │   └──────────┘   │
//! ┌───────┐│   ┌──────────┐   │   ┌─────┐   ┌────────┐
//! │ input │┼──▶│ branch_b │───┼──▶│ cat │──▶│ output │
//! └───────┘│   └──────────┘   │   └─────┘   └────────┘
//!          │   ┌──────────┐   │
//!          └──▶│ branch_c │───┘
//!              └──────────┘
//! ```
//!
//! Values are plain `Vec<f32>` feature vectors, so the whole module fits in
//! a [`Graph<Features>`].

use dagnet_graph::{Graph, ValidationError};
use dagnet_unit::{Output, Unit, UnitError};

/// Feature vector carried along the graph edges.
pub type Features = Vec<f32>;

/// Exponential linear unit.
#[must_use]
pub fn elu(x: f32, alpha: f32) -> f32 {
    if x > 0.0 { x } else { alpha * (x.exp() - 1.0) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Units
// ─────────────────────────────────────────────────────────────────────────────

/// Element-wise `elu(scale * x + bias)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineElu {
    /// Multiplier applied to every feature.
    pub scale: f32,
    /// Offset added after scaling.
    pub bias: f32,
    /// ELU saturation value for negative inputs.
    pub alpha: f32,
}

impl AffineElu {
    /// Creates a branch with `alpha = 1.0`.
    #[must_use]
    pub fn new(scale: f32, bias: f32) -> Self {
        Self {
            scale,
            bias,
            alpha: 1.0,
        }
    }
}

impl Unit<Features> for AffineElu {
    fn forward(&mut self, mut inputs: Vec<Features>) -> Result<Output<Features>, UnitError> {
        if inputs.len() != 1 {
            return Err(UnitError::InputArity {
                expected: 1,
                got: inputs.len(),
            });
        }
        let mut features = inputs.remove(0);
        for x in &mut features {
            *x = elu(self.scale * *x + self.bias, self.alpha);
        }
        Ok(Output::Single(features))
    }

    fn name(&self) -> &'static str {
        "affine_elu"
    }
}

/// Joins every input vector end to end, in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Concatenate;

impl Unit<Features> for Concatenate {
    fn forward(&mut self, inputs: Vec<Features>) -> Result<Output<Features>, UnitError> {
        if inputs.is_empty() {
            return Err(UnitError::ExecutionError(
                "nothing to concatenate".to_owned(),
            ));
        }
        Ok(Output::Single(inputs.concat()))
    }

    fn name(&self) -> &'static str {
        "concatenate"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graph
// ─────────────────────────────────────────────────────────────────────────────

/// Branch names, in concatenation order.
pub const BRANCHES: [&str; 3] = ["branch_a", "branch_b", "branch_c"];

/// Builds the inception module from one unit per branch.
///
/// # Errors
///
/// Construction only fails on a structural error, which the fixed layout
/// never triggers; the `Result` mirrors the builder API.
pub fn inception_module(branches: [AffineElu; 3]) -> Result<Graph<Features>, ValidationError> {
    let mut graph = Graph::new();
    graph.add_input_node("input")?;
    for (name, unit) in BRANCHES.into_iter().zip(branches) {
        graph.add_node(name, unit, &["input"])?;
    }
    graph
        .add_node("cat", Concatenate, &BRANCHES)?
        .add_output_node("output", &["cat"])?;
    graph.assert_valid()?;
    Ok(graph)
}

/// Default branch parameters used by the `inception` binary.
#[must_use]
pub fn default_branches() -> [AffineElu; 3] {
    [
        AffineElu::new(1.0, 0.0),
        AffineElu::new(0.5, -1.0),
        AffineElu::new(-2.0, 0.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elu_is_identity_for_positive_inputs() {
        assert_eq!(elu(2.5, 1.0), 2.5);
        assert!(elu(-1.0, 1.0) < 0.0);
        assert!(elu(-100.0, 1.0) > -1.0 - f32::EPSILON);
    }

    #[test]
    fn affine_elu_requires_one_input() {
        let mut unit = AffineElu::new(1.0, 0.0);
        let err = unit.forward(vec![vec![1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(err, UnitError::InputArity { expected: 1, got: 2 }));
    }

    #[test]
    fn concatenate_keeps_input_order() {
        let out = Concatenate
            .forward(vec![vec![1.0], vec![2.0, 3.0], vec![]])
            .unwrap();
        assert_eq!(out, Output::Single(vec![1.0, 2.0, 3.0]));
        assert!(Concatenate.forward(vec![]).is_err());
    }

    #[test]
    fn module_has_inception_shape() {
        let graph = inception_module(default_branches()).unwrap();
        assert_eq!(graph.input_nodes(), ["input"]);
        assert_eq!(graph.output_nodes(), ["output"]);
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 7);
    }

    #[test]
    fn branches_are_concatenated_in_order() {
        let identity = AffineElu::new(1.0, 0.0);
        let mut graph = inception_module([identity; 3]).unwrap();

        let out = graph.forward(vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            out,
            Output::Single(Output::Single(vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]))
        );
    }

    #[test]
    fn output_triples_the_feature_count() {
        let mut graph = inception_module(default_branches()).unwrap();
        let input = vec![0.25; 8];

        let out = graph.forward(vec![input]).unwrap();
        let features = out.into_single().and_then(Output::into_single).unwrap();
        assert_eq!(features.len(), 24);
        // branch_a is the identity on positive inputs
        assert_eq!(&features[..8], &[0.25; 8]);
    }
}

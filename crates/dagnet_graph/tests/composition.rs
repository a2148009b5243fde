//! Tests for graph composition and structural properties.
//!
//! 1. **Nesting**: a graph attached as a node of another graph
//! 2. **Property-Based**: random construction sequences checked against the
//!    structural guarantees of the builder and the engine
//!
//! ## Construction DSL
//!
//! `Step` describes one construction call over a small pool of node names.
//! Random step lists are replayed against a fresh graph; calls that fail are
//! expected to leave the graph untouched, calls that succeed must keep it a
//! valid DAG.


use dagnet_graph::Graph;
use dagnet_unit::{Output, Unit, UnitError};
use test_utils::{add_one, double, linear_chain, sum};

// ─────────────────────────────────────────────────────────────────────────────
// Nesting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn nested_graph_runs_as_a_node() {
    let inner = linear_chain();

    let mut outer = Graph::<i64>::new();
    outer
        .add_input_node("x")
        .unwrap()
        .add_node("inner", inner, &["x"])
        .unwrap()
        .add_node("after", add_one, &["inner"])
        .unwrap()
        .add_output_node("y", &["after"])
        .unwrap();

    // ((2 + 1) * 3) + 1
    assert_eq!(
        outer.forward(vec![2]).unwrap(),
        Output::Single(Output::Single(10))
    );
}

#[test]
fn nested_graph_outputs_are_flattened() {
    let mut inner = Graph::<i64>::new();
    inner
        .add_input_node("a")
        .unwrap()
        .add_input_node("b")
        .unwrap()
        .add_node("da", double, &["a"])
        .unwrap()
        .add_node("db", double, &["b"])
        .unwrap()
        .add_output_node("both", &["da", "db"])
        .unwrap()
        .add_output_node("sum", &["da"])
        .unwrap();

    let mut outer = Graph::<i64>::new();
    outer
        .add_input_node("p")
        .unwrap()
        .add_input_node("q")
        .unwrap()
        .add_node("inner", inner, &["p", "q"])
        .unwrap()
        .add_output_node("r1", &["inner"])
        .unwrap()
        .add_output_node("r2", &["inner"])
        .unwrap()
        .add_output_node("r3", &["inner"])
        .unwrap();

    // inner yields [2p, 2q] from `both` then [2p] from `sum`
    assert_eq!(
        outer.forward(vec![1, 5]).unwrap(),
        Output::Many(vec![
            Output::Single(2),
            Output::Single(10),
            Output::Single(2)
        ])
    );
}

#[test]
fn nested_failure_surfaces_as_unit_error() {
    let mut inner = Graph::<i64>::new();
    inner
        .add_input_node("a")
        .unwrap()
        .add_input_node("b")
        .unwrap()
        .add_node("s", sum, &["a", "b"])
        .unwrap()
        .add_output_node("o", &["s"])
        .unwrap();

    let mut outer = Graph::<i64>::new();
    outer
        .add_input_node("x")
        .unwrap()
        .add_node("inner", inner, &["x"])
        .unwrap()
        .add_output_node("y", &["inner"])
        .unwrap();

    let err = outer.forward(vec![1]).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "unit of node 'inner' failed: was expecting 2 argument(s) for as many input nodes, got 1"
    );
}

#[test]
fn graph_unit_keeps_nested_state() {
    struct Counter(i64);

    impl Unit<i64> for Counter {
        fn forward(&mut self, _inputs: Vec<i64>) -> Result<Output<i64>, UnitError> {
            self.0 += 1;
            Ok(Output::Single(self.0))
        }
    }

    let mut inner = Graph::<i64>::new();
    inner
        .add_input_node("x")
        .unwrap()
        .add_node("count", Counter(0), &["x"])
        .unwrap()
        .add_output_node("y", &["count"])
        .unwrap();

    let mut unit: Box<dyn Unit<i64>> = Box::new(inner);
    unit.forward(vec![0]).unwrap();
    assert_eq!(unit.forward(vec![0]).unwrap(), Output::Single(2));
    assert_eq!(unit.name(), "graph");
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests
// ─────────────────────────────────────────────────────────────────────────────

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    const POOL: usize = 8;

    /// One construction call over node names `n0..n{POOL}`.
    #[derive(Debug, Clone)]
    enum Step {
        Input(usize),
        Output(usize, Vec<usize>),
        Plain(usize, Vec<usize>),
        Edge(usize, usize),
    }

    fn name(index: usize) -> String {
        format!("n{index}")
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        let node = 0..POOL;
        let previous = prop::collection::vec(0..POOL, 0..3);
        prop_oneof![
            node.clone().prop_map(Step::Input),
            (node.clone(), previous.clone()).prop_map(|(n, p)| Step::Output(n, p)),
            (node.clone(), previous).prop_map(|(n, p)| Step::Plain(n, p)),
            (node.clone(), node).prop_map(|(a, b)| Step::Edge(a, b)),
        ]
    }

    type Snapshot = (Vec<String>, Vec<(String, String)>, Vec<String>, Vec<String>);

    fn snapshot(graph: &Graph<i64>) -> Snapshot {
        (
            graph.node_names().map(str::to_owned).collect(),
            graph
                .edges()
                .map(|(a, b)| (a.to_owned(), b.to_owned()))
                .collect(),
            graph.input_nodes().into_iter().map(str::to_owned).collect(),
            graph.output_nodes().into_iter().map(str::to_owned).collect(),
        )
    }

    fn apply(graph: &mut Graph<i64>, step: &Step) -> bool {
        let names = |indices: &[usize]| indices.iter().map(|&i| name(i)).collect::<Vec<_>>();
        match step {
            Step::Input(n) => graph.add_input_node(&name(*n)).is_ok(),
            Step::Output(n, previous) => {
                let previous = names(previous);
                let previous: Vec<&str> = previous.iter().map(String::as_str).collect();
                graph.add_output_node(&name(*n), &previous).is_ok()
            }
            Step::Plain(n, previous) => {
                let previous = names(previous);
                let previous: Vec<&str> = previous.iter().map(String::as_str).collect();
                graph.add_node(&name(*n), sum, &previous).is_ok()
            }
            Step::Edge(a, b) => graph.add_edge(&name(*a), &name(*b)).is_ok(),
        }
    }

    fn build(steps: &[Step]) -> Graph<i64> {
        let mut graph = Graph::new();
        for step in steps {
            apply(&mut graph, step);
        }
        graph
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// After any sequence of construction calls, the graph is valid, and
        /// every failed call left it unchanged.
        #[test]
        fn prop_construction_keeps_graph_valid(steps in prop::collection::vec(arb_step(), 0..40)) {
            let mut graph = Graph::<i64>::new();
            for step in &steps {
                let before = snapshot(&graph);
                if !apply(&mut graph, step) {
                    prop_assert_eq!(snapshot(&graph), before, "failed step {:?} mutated graph", step);
                }
                prop_assert!(graph.is_valid());
            }
        }

        /// Every edge's source precedes its target in the topological order.
        #[test]
        fn prop_topological_order_respects_edges(steps in prop::collection::vec(arb_step(), 0..40)) {
            let graph = build(&steps);
            let order = graph.topological_order().unwrap();
            prop_assert_eq!(order.len(), graph.node_count());
            let position = |node: &str| order.iter().position(|n| *n == node);
            for (from, to) in graph.edges() {
                prop_assert!(position(from) < position(to), "{} -> {}", from, to);
            }
        }

        /// Identical construction sequences give identical orders and results.
        #[test]
        fn prop_construction_is_deterministic(
            steps in prop::collection::vec(arb_step(), 0..40),
            seed in -100i64..100,
        ) {
            let mut first = build(&steps);
            let mut second = build(&steps);

            prop_assert_eq!(snapshot(&first), snapshot(&second));
            prop_assert_eq!(first.topological_order().unwrap(), second.topological_order().unwrap());

            let inputs = vec![seed; first.input_nodes().len()];
            let a = first.forward(inputs.clone()).map_err(|err| err.to_string());
            let b = second.forward(inputs.clone()).map_err(|err| err.to_string());
            prop_assert_eq!(&a, &b);

            // A second call on the same graph sees no leftover payloads.
            let again = first.forward(inputs).map_err(|err| err.to_string());
            prop_assert_eq!(a, again);
        }
    }
}

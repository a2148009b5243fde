//! Edge-case tests for graph construction and execution.
//!
//! Includes the deliberately permissive cases: undeclared sources and sinks
//! pass validation, and only fail (or are silently ignored) at call time.


use dagnet_graph::{ExecutionError, Graph, GraphExecutor, Payloads, ValidationError};
use dagnet_unit::{Output, UnitError};
use test_utils::{ExecutionLog, double, echo_all, split_pair};

// ─────────────────────────────────────────────────────────────────────────────
// Permissive structure
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn undeclared_source_passes_validation_but_fails_at_call_time() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("orphan", double, &[])
        .unwrap()
        .add_node("join", echo_all, &["x", "orphan"])
        .unwrap()
        .add_output_node("y", &["join"])
        .unwrap();

    // Only declared roles are checked.
    assert!(graph.is_valid());
    assert!(graph.assert_valid().is_ok());

    let err = graph.forward(vec![1]).unwrap_err();
    assert!(matches!(err, ExecutionError::MissingInput(ref name) if name == "orphan"));
}

#[test]
fn undeclared_sink_runs_and_its_result_is_dropped() {
    let log = ExecutionLog::default();
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("side", log.recording("side"), &["x"])
        .unwrap()
        .add_node("main", double, &["x"])
        .unwrap()
        .add_output_node("y", &["main"])
        .unwrap();

    assert!(graph.assert_valid().is_ok());
    assert_eq!(
        graph.forward(vec![2]).unwrap(),
        Output::Single(Output::Single(4))
    );
    assert_eq!(log.count("side"), 1);
}

#[test]
fn graph_without_inputs_takes_no_arguments() {
    let mut graph = Graph::<i64>::new();
    let result = graph.forward(vec![]).unwrap();
    assert_eq!(result, Output::Many(vec![]));

    let err = graph.forward(vec![1]).unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::ArityMismatch {
            expected: 0,
            got: 1
        }
    ));
}

#[test]
fn input_can_feed_output_directly() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_output_node("y", &["x"])
        .unwrap();

    assert_eq!(
        graph.forward(vec![11]).unwrap(),
        Output::Single(Output::Single(11))
    );
}

#[test]
fn input_node_cannot_be_a_predecessor_of_itself() {
    let mut graph = Graph::<i64>::new();
    graph.add_input_node("x").unwrap();
    let err = graph.add_edge("x", "x").unwrap_err();
    assert!(matches!(err, ValidationError::CyclicGraph { .. }));
    assert_eq!(graph.edge_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Output routing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn one_element_sequence_is_broadcast() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("wrap", |v: Vec<i64>| Output::Many(v), &["x"])
        .unwrap()
        .add_output_node("a", &["wrap"])
        .unwrap()
        .add_output_node("b", &["wrap"])
        .unwrap();

    assert_eq!(
        graph.forward(vec![3]).unwrap(),
        Output::Many(vec![Output::Single(3), Output::Single(3)])
    );
}

#[test]
fn empty_result_cannot_feed_an_edge() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("nothing", |_: Vec<i64>| Output::Many(vec![]), &["x"])
        .unwrap()
        .add_output_node("y", &["nothing"])
        .unwrap();

    let err = graph.forward(vec![1]).unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::OutputArityMismatch {
            produced: 0,
            expected: 1,
            ..
        }
    ));
}

#[test]
fn two_values_cannot_feed_three_edges() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("pair", split_pair, &["x"])
        .unwrap();
    for name in ["o1", "o2", "o3"] {
        graph.add_output_node(name, &["pair"]).unwrap();
    }

    let err = graph.forward(vec![1]).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "number of outputs from the unit (2) does not match the number of out-edges (3) for node 'pair'"
    );
}

#[test]
fn multiple_values_into_single_edge_is_a_mismatch() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("pair", split_pair, &["x"])
        .unwrap()
        .add_output_node("y", &["pair"])
        .unwrap();

    assert!(matches!(
        graph.forward(vec![1]),
        Err(ExecutionError::OutputArityMismatch {
            produced: 2,
            expected: 1,
            ..
        })
    ));
}

#[test]
fn output_fan_in_of_one_collapses_to_single() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("a", double, &["x"])
        .unwrap()
        .add_node("b", double, &["x"])
        .unwrap()
        .add_output_node("one", &["a"])
        .unwrap()
        .add_output_node("two", &["a", "b"])
        .unwrap();

    assert_eq!(
        graph.forward(vec![1]).unwrap(),
        Output::Many(vec![Output::Single(2), Output::Many(vec![2, 2])])
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unit_arity_error_is_wrapped_with_node_name() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node(
            "strict",
            |v: Vec<i64>| -> Result<Output<i64>, UnitError> {
                if v.len() == 2 {
                    Ok(Output::Single(v[0] + v[1]))
                } else {
                    Err(UnitError::InputArity {
                        expected: 2,
                        got: v.len(),
                    })
                }
            },
            &["x"],
        )
        .unwrap()
        .add_output_node("y", &["strict"])
        .unwrap();

    let err = graph.forward(vec![1]).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "unit of node 'strict' failed: expected 2 input(s), got 1"
    );
}

#[test]
fn manual_stepping_out_of_order_reports_missing_payload() {
    let mut graph = test_utils::linear_chain();
    let executor = GraphExecutor::new();
    let mut payloads = Payloads::new();

    let err = executor
        .forward_through_node(&mut graph, &mut payloads, "n2", None)
        .unwrap_err();
    assert!(matches!(err, ExecutionError::MissingPayload { ref node, .. } if node == "n2"));

    executor
        .forward_through_node(&mut graph, &mut payloads, "x", Some(1))
        .unwrap();
    executor
        .forward_through_node(&mut graph, &mut payloads, "n1", None)
        .unwrap();
    let out = executor
        .forward_through_node(&mut graph, &mut payloads, "n2", None)
        .unwrap();
    assert_eq!(out, Output::Single(6));
    assert_eq!(payloads.occupied(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Names
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn names_are_arbitrary_strings() {
    let mut graph = Graph::<i64>::new();
    graph
        .add_input_node("entrée")
        .unwrap()
        .add_node("node with spaces", double, &["entrée"])
        .unwrap()
        .add_output_node("", &["node with spaces"])
        .unwrap();

    assert_eq!(graph.output_nodes(), [""]);
    assert_eq!(
        graph.forward(vec![4]).unwrap(),
        Output::Single(Output::Single(8))
    );
}

#[test]
fn wide_fan_out_broadcasts_to_every_edge() {
    let mut graph = Graph::<i64>::new();
    graph.add_input_node("x").unwrap();
    let names: Vec<String> = (0..64).map(|i| format!("leaf{i}")).collect();
    for name in &names {
        graph.add_node(name, double, &["x"]).unwrap();
    }
    let leaves: Vec<&str> = names.iter().map(String::as_str).collect();
    graph.add_output_node("y", &leaves).unwrap();

    let result = graph.forward(vec![1]).unwrap();
    assert_eq!(result, Output::Single(Output::Many(vec![2; 64])));
}

//! Tests that executor events reach the log through [`EventLogger`].

use std::io;
use std::sync::{Arc, Mutex};

use dagnet_core_plugins::EventLogger;
use dagnet_graph::hooks::{EventKind, HooksAPI};
use dagnet_graph::{Graph, GraphExecutor};
use dagnet_unit::{Output, UnitError};

/// Shared buffer the test subscriber writes into.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs(run: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    captured.contents()
}

fn chain() -> Graph<i64> {
    let mut graph = Graph::new();
    graph
        .add_input_node("x")
        .unwrap()
        .add_node("double", |v: Vec<i64>| Output::Single(v[0] * 2), &["x"])
        .unwrap()
        .add_output_node("y", &["double"])
        .unwrap();
    graph
}

#[test]
fn successful_pass_is_logged() {
    let hooks = Arc::new(HooksAPI::new());
    EventLogger::new().register(&hooks).unwrap();
    let executor = GraphExecutor::new().with_hooks(hooks);

    let logs = with_captured_logs(|| {
        let mut graph = chain();
        executor.execute(&mut graph, vec![4]).unwrap();
    });

    assert!(logs.contains("graph started"));
    assert!(logs.contains("node started"));
    assert!(logs.contains("node=\"double\"") || logs.contains("node=double"));
    assert!(logs.contains("node complete"));
    assert!(logs.contains("graph complete"));
    assert!(!logs.contains("graph failed"));
}

#[test]
fn failed_pass_is_logged_as_error() {
    let hooks = Arc::new(HooksAPI::new());
    EventLogger::new()
        .with_kinds(&EventKind::GRAPH)
        .register(&hooks)
        .unwrap();
    let executor = GraphExecutor::new().with_hooks(hooks);

    let logs = with_captured_logs(|| {
        let mut graph = Graph::<i64>::new();
        graph
            .add_input_node("x")
            .unwrap()
            .add_node(
                "broken",
                |_: Vec<i64>| -> Result<Output<i64>, UnitError> { Err(UnitError::ExecutionError("boom".into())) },
                &["x"],
            )
            .unwrap()
            .add_output_node("y", &["broken"])
            .unwrap();
        assert!(executor.execute(&mut graph, vec![1]).is_err());
    });

    assert!(logs.contains("ERROR"));
    assert!(logs.contains("graph failed"));
    assert!(logs.contains("boom"));
    assert!(!logs.contains("node started"));
}

#[test]
fn unregistered_logger_is_silent() {
    let hooks = Arc::new(HooksAPI::new());
    let logger = EventLogger::new();
    logger.register(&hooks).unwrap();
    logger.unregister(&hooks);
    let executor = GraphExecutor::new().with_hooks(hooks);

    let logs = with_captured_logs(|| {
        let mut graph = chain();
        executor.execute(&mut graph, vec![1]).unwrap();
    });

    assert!(!logs.contains("dagnet::events"));
}

//! Runs the naive inception module on a synthetic feature vector.
//!
//! # Usage
//!
//! ```bash
//! inception [features]
//! ```
//!
//! `features` is the input length (default 8). Filter directives are read
//! from `DAGNET_LOG`, e.g. `DAGNET_LOG=dagnet::events=trace`.

use std::sync::Arc;

use dagnet_core_plugins::{EventLogger, TracingConfig, TracingFormat};
use dagnet_graph::GraphExecutor;
use dagnet_graph::hooks::HooksAPI;
use example::{default_branches, inception_module};
use tracing::Level;

fn main() {
    let mut logging = TracingConfig::new()
        .with_level(Level::INFO)
        .with_format(TracingFormat::Compact);
    if let Ok(directive) = std::env::var("DAGNET_LOG") {
        logging = logging.with_env_filter(directive);
    }
    logging.init();

    let features = match std::env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => 8,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            tracing::error!(error = %e, "feature count must be a non-negative integer");
            std::process::exit(1);
        }
    };

    let hooks = Arc::new(HooksAPI::new());
    if let Err(e) = EventLogger::new().register(&hooks) {
        tracing::error!(error = %e, "could not register event logger");
        std::process::exit(1);
    }
    let executor = GraphExecutor::new().with_hooks(hooks);

    let mut graph = match inception_module(default_branches()) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::error!(error = %e, "invalid inception graph");
            std::process::exit(1);
        }
    };

    let input: Vec<f32> = (0..features)
        .map(|i| i as f32 / features.max(1) as f32 - 0.5)
        .collect();

    match executor.execute(&mut graph, vec![input]) {
        Ok(output) => {
            let features = output.into_vec().into_iter().flatten().flatten().collect::<Vec<_>>();
            tracing::info!(len = features.len(), ?features, "inception output");
        }
        Err(e) => {
            tracing::error!(error = %e, "forward pass failed");
            std::process::exit(1);
        }
    }
}

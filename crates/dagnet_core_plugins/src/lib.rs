//! Ambient plugins for dagnet applications.
//!
//! - [`TracingConfig`] - Installs a `tracing` subscriber (pretty, compact or JSON)
//! - [`EventLogger`] - Logs executor events from a [`HooksAPI`](dagnet_graph::hooks::HooksAPI)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dagnet_core_plugins::{EventLogger, TracingConfig};
//! use dagnet_graph::GraphExecutor;
//! use dagnet_graph::hooks::HooksAPI;
//! use tracing::Level;
//!
//! TracingConfig::new().with_level(Level::DEBUG).init();
//!
//! let hooks = Arc::new(HooksAPI::new());
//! EventLogger::new().register(&hooks).unwrap();
//! let executor = GraphExecutor::new().with_hooks(hooks);
//! # let _ = executor;
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`dagnet_unit`): The unit contract and output shape
//! - **Layer 2** (`dagnet_graph`): Graph construction, validation and execution
//! - **Layer 3** (this crate): Logging and observers built on the layers below

mod event_logger;
mod tracing_plugin;

pub use event_logger::{DEFAULT_HOOK_NAME, EventLogger};
pub use tracing_plugin::{TracingConfig, TracingFormat, TracingInitError};

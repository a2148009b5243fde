//! Lifecycle hooks for forward passes.
//!
//! Hooks let plugins observe a [`GraphExecutor`](crate::executor::GraphExecutor)
//! without changing what it computes: logging, timing, counting node runs.
//!
//! # Design Principles
//!
//! - Hooks execute synchronously, in registration order
//! - Hooks observe; they cannot alter payloads or results
//! - Each hook subscribes to a set of [`EventKind`]s
//!
//! # Architecture
//!
//! - **Events** ([`events`]): the `GraphEvent` enum carrying context to hooks
//! - **API** ([`api`]): registration and invocation
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dagnet_graph::hooks::{EventKind, GraphEvent, HooksAPI};
//! use dagnet_graph::GraphExecutor;
//!
//! let hooks = Arc::new(HooksAPI::new());
//! hooks.register_observer("failures", &[EventKind::GraphFailure], |event: &GraphEvent<'_>| {
//!     if let GraphEvent::GraphFailure { error } = event {
//!         eprintln!("forward pass failed: {error}");
//!     }
//! })?;
//!
//! let executor = GraphExecutor::new().with_hooks(hooks);
//! # let _ = executor;
//! # Ok::<(), dagnet_graph::hooks::HookRegistrationError>(())
//! ```

pub mod api;
pub mod events;

pub use api::{HookRegistrationError, HooksAPI};
pub use events::{EventKind, GraphEvent};

//! Logs forward-pass events through `tracing`.
//!
//! [`EventLogger`] registers one observer on a [`HooksAPI`] and turns each
//! [`GraphEvent`] into a `tracing` event under the `dagnet::events` target.
//! Graph failures are logged at `ERROR`, graph boundaries at `INFO`, node
//! events at `DEBUG` (completion) and `TRACE` (start).

use dagnet_graph::hooks::{EventKind, GraphEvent, HookRegistrationError, HooksAPI};

/// Hook name used when none is given.
pub const DEFAULT_HOOK_NAME: &str = "dagnet::event_logger";

/// Observer that mirrors executor events into the log.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dagnet_core_plugins::EventLogger;
/// use dagnet_graph::GraphExecutor;
/// use dagnet_graph::hooks::{EventKind, HooksAPI};
///
/// let hooks = Arc::new(HooksAPI::new());
/// EventLogger::new()
///     .with_kinds(&EventKind::GRAPH)
///     .register(&hooks)
///     .unwrap();
///
/// let executor = GraphExecutor::new().with_hooks(hooks);
/// # let _ = executor;
/// ```
#[derive(Debug, Clone)]
pub struct EventLogger {
    name: String,
    kinds: Vec<EventKind>,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self {
            name: DEFAULT_HOOK_NAME.to_owned(),
            kinds: EventKind::ALL.to_vec(),
        }
    }
}

impl EventLogger {
    /// Creates a logger for every event kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hook name, so several loggers can share one registry.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts the logger to the given kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: &[EventKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    /// Returns the hook name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kinds this logger listens to.
    #[must_use]
    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }

    /// Registers the logger on `hooks`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if a hook with the
    /// same name is already registered for one of the kinds.
    pub fn register(&self, hooks: &HooksAPI) -> Result<(), HookRegistrationError> {
        hooks.register_observer(self.name.clone(), &self.kinds, log_event)?;
        tracing::debug!(name = %self.name, kinds = ?self.kinds, "event logger registered");
        Ok(())
    }

    /// Removes the logger from `hooks`, returning how many entries went away.
    pub fn unregister(&self, hooks: &HooksAPI) -> usize {
        hooks.unregister(&self.name)
    }
}

fn log_event(event: &GraphEvent<'_>) {
    match *event {
        GraphEvent::GraphStart {
            input_count,
            node_count,
        } => {
            tracing::info!(target: "dagnet::events", input_count, node_count, "graph started");
        }
        GraphEvent::GraphComplete {
            nodes_executed,
            duration,
        } => {
            tracing::info!(target: "dagnet::events", nodes_executed, ?duration, "graph complete");
        }
        GraphEvent::GraphFailure { error } => {
            tracing::error!(target: "dagnet::events", %error, "graph failed");
        }
        GraphEvent::NodeStart {
            node_id,
            node_name,
            unit_name,
        } => {
            tracing::trace!(target: "dagnet::events", %node_id, node = node_name, unit = unit_name, "node started");
        }
        GraphEvent::NodeComplete {
            node_id,
            node_name,
            produced,
            broadcast,
            duration,
        } => {
            tracing::debug!(
                target: "dagnet::events",
                %node_id,
                node = node_name,
                produced,
                broadcast,
                ?duration,
                "node complete"
            );
        }
    }
}

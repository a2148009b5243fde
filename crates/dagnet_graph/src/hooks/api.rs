//! Hook registration API for forward passes.
//!
//! The [`HooksAPI`] is a registry of named observers that a
//! [`GraphExecutor`](crate::executor::GraphExecutor) invokes at each
//! lifecycle point of a forward pass.
//!
//! # Multi-Kind Registration
//!
//! One observer can subscribe to several event kinds at once:
//!
//! ```
//! use dagnet_graph::hooks::{EventKind, GraphEvent, HooksAPI};
//!
//! let hooks = HooksAPI::new();
//! hooks.register_observer("tracker", &EventKind::NODE, |event: &GraphEvent<'_>| {
//!     match event {
//!         GraphEvent::NodeStart { node_name, .. } => println!("start: {node_name}"),
//!         GraphEvent::NodeComplete { duration, .. } => println!("done: {duration:?}"),
//!         _ => {}
//!     }
//! })?;
//! assert_eq!(hooks.hook_count(EventKind::NodeStart), 1);
//! # Ok::<(), dagnet_graph::hooks::HookRegistrationError>(())
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::events::{EventKind, GraphEvent};

/// Type-erased observer shared by every kind it is registered for.
type SharedHook = Arc<dyn Fn(&GraphEvent<'_>) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRegistrationError {
    /// A hook with this name already exists for the event kind.
    DuplicateName {
        /// The event kind where the duplicate was found.
        kind: EventKind,
        /// The duplicate hook name.
        name: String,
    },
}

impl fmt::Display for HookRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookRegistrationError::DuplicateName { kind, name } => {
                write!(f, "hook '{name}' already registered for event '{kind:?}'")
            }
        }
    }
}

impl core::error::Error for HookRegistrationError {}

// ─────────────────────────────────────────────────────────────────────────────
// HooksAPI
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the hook registry.
struct HookEntry {
    /// Human-readable name for debugging and unregistration.
    name: String,
    /// The observer function.
    hook: SharedHook,
}

/// Registry of forward-pass observers.
///
/// Hooks are grouped by [`EventKind`] and run synchronously in registration
/// order. The registry uses a [`RwLock`] so it can be shared behind an `Arc`
/// by several executors. The lock is released before observers run, so an
/// observer may register or unregister hooks on the registry invoking it;
/// such changes take effect from the next event.
#[derive(Default)]
pub struct HooksAPI {
    /// Maps event kind to its hook entries.
    hooks: RwLock<HashMap<EventKind, Vec<HookEntry>>>,
}

impl HooksAPI {
    /// Creates a new empty hooks registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for every kind in `kinds`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if `name` is already
    /// registered for one of the kinds. Nothing is registered in that case.
    pub fn register_observer<F>(
        &self,
        name: impl Into<String>,
        kinds: &[EventKind],
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&GraphEvent<'_>) + Send + Sync + 'static,
    {
        let name = name.into();
        let hook: SharedHook = Arc::new(hook);

        let mut hooks = self.hooks.write();
        for kind in kinds {
            if hooks
                .get(kind)
                .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
            {
                return Err(HookRegistrationError::DuplicateName {
                    kind: *kind,
                    name,
                });
            }
        }

        for kind in kinds {
            let entries = hooks.entry(*kind).or_default();
            // Repeated kinds in one call register once.
            if entries.iter().any(|entry| entry.name == name) {
                continue;
            }
            entries.push(HookEntry {
                name: name.clone(),
                hook: Arc::clone(&hook),
            });
        }
        Ok(self)
    }

    /// Removes the hook with this name from every kind.
    ///
    /// Returns the number of registrations removed.
    pub fn unregister(&self, name: &str) -> usize {
        let mut hooks = self.hooks.write();
        let mut removed = 0;
        for entries in hooks.values_mut() {
            let before = entries.len();
            entries.retain(|entry| entry.name != name);
            removed += before - entries.len();
        }
        removed
    }

    /// Invokes every hook registered for the event's kind.
    pub fn invoke(&self, event: &GraphEvent<'_>) {
        let snapshot: Vec<SharedHook> = match self.hooks.read().get(&event.kind()) {
            Some(entries) => entries.iter().map(|entry| Arc::clone(&entry.hook)).collect(),
            None => return,
        };
        for hook in snapshot {
            hook(event);
        }
    }

    /// Returns the number of hooks registered for the kind.
    #[must_use]
    pub fn hook_count(&self, kind: EventKind) -> usize {
        self.hooks.read().get(&kind).map_or(0, Vec::len)
    }

    /// Checks if a hook with the given name exists for the kind.
    #[must_use]
    pub fn contains_hook(&self, kind: EventKind, name: &str) -> bool {
        self.hooks
            .read()
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }

    /// Returns the hook names registered for the kind, in invocation order.
    #[must_use]
    pub fn hook_names(&self, kind: EventKind) -> Vec<String> {
        self.hooks
            .read()
            .get(&kind)
            .map(|entries| entries.iter().map(|entry| entry.name.clone()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for HooksAPI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            if let Some(entries) = hooks.get(&kind)
                && !entries.is_empty()
            {
                let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
                map.entry(&kind, &names);
            }
        }
        map.finish()
    }
}

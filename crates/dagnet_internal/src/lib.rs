//! # dagnet Internal Library
//!
//! Re-exports the core dagnet crates for convenience.

/// Layer 1: the attached-unit contract.
pub use dagnet_unit;

/// Layer 2: graph construction, validation and execution.
pub use dagnet_graph;

/// Layer 3: logging and observability helpers.
pub use dagnet_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use dagnet_core_plugins::{EventLogger, TracingConfig, TracingFormat};
    pub use dagnet_graph::prelude::*;
    pub use dagnet_unit::prelude::*;
}

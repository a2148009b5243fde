//! Build computations as validated directed acyclic graphs of named units,
//! then run the whole assembly as a single callable.
//!

pub use dagnet_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use dagnet_internal::prelude::*;
}

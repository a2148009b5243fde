//! The computational-unit contract for dagnet (Layer 1).
//!
//! `dagnet_unit` defines what a graph node runs. The graph layer treats every
//! unit as a black box that maps an ordered sequence of input values to one
//! value or an ordered sequence of values:
//!
//! - [`output`] - [`Output`], the "one or many" result shape
//! - [`unit`] - the [`Unit`] trait, type erasure and closure conversion
//! - [`identity`] - the pass-through unit attached to input nodes
//!
//! # Architecture
//!
//! - **Layer 1** (`dagnet_unit`): unit contract (this crate)
//! - **Layer 2** (`dagnet_graph`): graph construction, validation and execution
//! - **Layer 3** (`dagnet_core_plugins`): logging and observability helpers
//!
//! # Example
//!
//! ```
//! use dagnet_unit::prelude::*;
//!
//! let mut double = (|inputs: Vec<i64>| Output::Single(inputs[0] * 2)).into_unit();
//! assert_eq!(double.forward(vec![21]).unwrap(), Output::Single(42));
//! ```

/// Pass-through unit.
pub mod identity;

/// The "one value or many values" result shape.
pub mod output;

/// Unit trait, type erasure and closure conversion.
pub mod unit;

pub use identity::Identity;
pub use output::Output;
pub use unit::{BoxedUnit, FnUnit, IntoUnit, Unit, UnitError};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::identity::*;
    pub use crate::output::*;
    pub use crate::unit::*;
}

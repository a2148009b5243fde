//! Unit execution primitives.
//!
//! A unit is the computation attached to a graph node. The graph hands it the
//! ordered payloads of the node's in-edges and routes whatever it returns onto
//! the node's out-edges. Units may keep internal state (learned parameters,
//! counters, caches) across calls; that state belongs to the unit, never to
//! the graph.
//!
//! # Example
//!
//! ```
//! use dagnet_unit::prelude::*;
//!
//! struct Accumulate {
//!     total: i64,
//! }
//!
//! impl Unit<i64> for Accumulate {
//!     fn forward(&mut self, inputs: Vec<i64>) -> Result<Output<i64>, UnitError> {
//!         self.total += inputs.iter().sum::<i64>();
//!         Ok(Output::Single(self.total))
//!     }
//! }
//!
//! let mut acc = Accumulate { total: 0 };
//! acc.forward(vec![1, 2]).unwrap();
//! assert_eq!(acc.forward(vec![3]).unwrap(), Output::Single(6));
//! ```

use core::marker::PhantomData;

use crate::output::Output;

/// Errors that can occur during unit execution.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// The unit received a different number of inputs than it accepts.
    #[error("expected {expected} input(s), got {got}")]
    InputArity {
        /// Number of inputs the unit accepts.
        expected: usize,
        /// Number of inputs it received.
        got: usize,
    },

    /// The unit encountered an error during execution.
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// An error raised by a nested component of the unit.
    #[error(transparent)]
    Other(Box<dyn core::error::Error + Send + Sync>),
}

impl UnitError {
    /// Wraps an arbitrary error as [`UnitError::Other`].
    pub fn other(err: impl core::error::Error + Send + Sync + 'static) -> Self {
        UnitError::Other(Box::new(err))
    }
}

/// A computational unit attached to a graph node.
///
/// Implementations receive the node's inputs as an ordered vector and return
/// either one value or an ordered sequence of values. The unit is invoked
/// through `&mut self`, so it may update internal state; the graph guarantees
/// it is never invoked concurrently.
///
/// Closures convert into units through [`IntoUnit`], so implementing this
/// trait by hand is only needed for stateful or reusable units.
pub trait Unit<V>: Send + 'static {
    /// Runs the unit on the given inputs.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] if the inputs are unacceptable or the computation fails.
    fn forward(&mut self, inputs: Vec<V>) -> Result<Output<V>, UnitError>;

    /// Returns the unit's name for debugging and tracing.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Boxed type-erased unit.
///
/// This is the owned handle each graph node stores.
pub type BoxedUnit<V> = Box<dyn Unit<V>>;

/// Converts a type into a [`Unit`].
///
/// Implemented for every [`Unit`] and for closures taking `Vec<V>` and
/// returning either `Output<V>` or `Result<Output<V>, UnitError>`.
///
/// # Marker Types
///
/// The `Marker` type parameter keeps the blanket implementations apart; it is
/// always inferred.
pub trait IntoUnit<V, Marker>: Sized {
    /// The resulting unit type.
    type Unit: Unit<V>;

    /// Converts this into a unit.
    fn into_unit(self) -> Self::Unit;

    /// Converts this into a boxed, type-erased unit.
    fn into_boxed_unit(self) -> BoxedUnit<V> {
        Box::new(self.into_unit())
    }
}

/// Marker for types that already implement [`Unit`].
pub struct UnitMarker;

impl<V, U: Unit<V>> IntoUnit<V, UnitMarker> for U {
    type Unit = U;

    fn into_unit(self) -> Self::Unit {
        self
    }
}

/// Marker for infallible closures returning [`Output`].
pub struct FunctionMarker;

/// Marker for fallible closures returning `Result<Output, UnitError>`.
pub struct FallibleFunctionMarker;

/// A unit wrapping a closure.
///
/// Created via [`IntoUnit`] for closures.
pub struct FnUnit<F, Marker> {
    func: F,
    name: &'static str,
    _marker: PhantomData<fn() -> Marker>,
}

impl<F, Marker> FnUnit<F, Marker> {
    /// Creates a new closure unit with the given name.
    pub fn new(func: F, name: &'static str) -> Self {
        Self {
            func,
            name,
            _marker: PhantomData,
        }
    }
}

impl<V, F> IntoUnit<V, (FunctionMarker,)> for F
where
    F: FnMut(Vec<V>) -> Output<V> + Send + 'static,
{
    type Unit = FnUnit<F, (FunctionMarker,)>;

    fn into_unit(self) -> Self::Unit {
        FnUnit::new(self, core::any::type_name::<F>())
    }
}

impl<V, F> Unit<V> for FnUnit<F, (FunctionMarker,)>
where
    F: FnMut(Vec<V>) -> Output<V> + Send + 'static,
{
    fn forward(&mut self, inputs: Vec<V>) -> Result<Output<V>, UnitError> {
        Ok((self.func)(inputs))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<V, F> IntoUnit<V, (FallibleFunctionMarker,)> for F
where
    F: FnMut(Vec<V>) -> Result<Output<V>, UnitError> + Send + 'static,
{
    type Unit = FnUnit<F, (FallibleFunctionMarker,)>;

    fn into_unit(self) -> Self::Unit {
        FnUnit::new(self, core::any::type_name::<F>())
    }
}

impl<V, F> Unit<V> for FnUnit<F, (FallibleFunctionMarker,)>
where
    F: FnMut(Vec<V>) -> Result<Output<V>, UnitError> + Send + 'static,
{
    fn forward(&mut self, inputs: Vec<V>) -> Result<Output<V>, UnitError> {
        (self.func)(inputs)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

//! The pass-through unit attached to graph input nodes.

use crate::output::Output;
use crate::unit::{Unit, UnitError};

/// A unit that returns its single input unchanged.
///
/// Input nodes carry an `Identity` so that an externally supplied value is
/// routed onto their out-edges exactly as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<V: 'static> Unit<V> for Identity {
    fn forward(&mut self, mut inputs: Vec<V>) -> Result<Output<V>, UnitError> {
        if inputs.len() != 1 {
            return Err(UnitError::InputArity {
                expected: 1,
                got: inputs.len(),
            });
        }
        inputs
            .pop()
            .map(Output::Single)
            .ok_or(UnitError::InputArity {
                expected: 1,
                got: 0,
            })
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

//! The result shape produced by units and by whole graphs.

use core::slice;

/// One value, or an ordered sequence of values.
///
/// Units return an `Output` so that a single-result unit does not have to wrap
/// its value in a one-element vector. The graph normalizes every result with
/// [`into_vec`](Self::into_vec) before routing it along out-edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Output<T> {
    /// A single value.
    Single(T),
    /// An ordered sequence of values.
    Many(Vec<T>),
}

impl<T> Output<T> {
    /// Builds an output from a vector, collapsing a one-element vector into
    /// [`Output::Single`].
    #[must_use]
    pub fn from_vec(mut values: Vec<T>) -> Self {
        if values.len() == 1
            && let Some(value) = values.pop()
        {
            return Output::Single(value);
        }
        Output::Many(values)
    }

    /// Normalizes into an ordered sequence. `Single` becomes a one-element vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Output::Single(value) => vec![value],
            Output::Many(values) => values,
        }
    }

    /// Returns the number of values carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Output::Single(_) => 1,
            Output::Many(values) => values.len(),
        }
    }

    /// Returns true if this is an empty `Many`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this is [`Output::Single`].
    #[must_use]
    pub fn is_single(&self) -> bool {
        matches!(self, Output::Single(_))
    }

    /// Returns the value if this is [`Output::Single`].
    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Output::Single(value) => Some(value),
            Output::Many(_) => None,
        }
    }

    /// Consumes the output, returning the value if this is [`Output::Single`].
    #[must_use]
    pub fn into_single(self) -> Option<T> {
        match self {
            Output::Single(value) => Some(value),
            Output::Many(_) => None,
        }
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Output::Single(value) => slice::from_ref(value),
            Output::Many(values) => values,
        }
    }

    /// Iterates over the carried values in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Applies `f` to every value, preserving the shape.
    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Output<U> {
        match self {
            Output::Single(value) => Output::Single(f(value)),
            Output::Many(values) => Output::Many(values.into_iter().map(f).collect()),
        }
    }
}

impl<T> Output<Output<T>> {
    /// Concatenates nested outputs into one flat output, in order.
    ///
    /// The result is collapsed with [`Output::from_vec`], so a nested output
    /// holding exactly one value flattens to `Single`.
    #[must_use]
    pub fn flatten(self) -> Output<T> {
        Output::from_vec(self.into_vec().into_iter().flat_map(Output::into_vec).collect())
    }
}

impl<T> IntoIterator for Output<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Output<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

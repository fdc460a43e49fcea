use crate::traits::Scalar;
use std::ops::Deref;

/// Flat parameter vector handed to every governing equation.
///
/// Layout is `x, dx, ..., x^(order), y, dy, ..., y^(order), ...` with a
/// fixed stride of `order + 1` per dimension. Indexing works directly on
/// the flat layout (`params[2]`), and [`Parameters::dimension`] offers a
/// checked view over the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters<T: Scalar> {
    values: Vec<T>,
    stride: usize,
}

impl<T: Scalar> Parameters<T> {
    pub(crate) fn with_capacity(dimensions: usize, stride: usize) -> Self {
        Self {
            values: Vec::with_capacity(dimensions * stride),
            stride,
        }
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Vec<T> {
        &mut self.values
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn dimension_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.values.len() / self.stride
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn dimension(&self, index: usize) -> Option<DimensionView<'_, T>> {
        let start = index.checked_mul(self.stride)?;
        let end = start.checked_add(self.stride)?;
        self.values
            .get(start..end)
            .map(|derivatives| DimensionView { derivatives })
    }
}

impl<T: Scalar> Deref for Parameters<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.values
    }
}

/// The derivative vector of one dimension inside [`Parameters`].
#[derive(Debug, Clone, Copy)]
pub struct DimensionView<'a, T: Scalar> {
    derivatives: &'a [T],
}

impl<'a, T: Scalar> DimensionView<'a, T> {
    pub fn derivative(&self, order: usize) -> Option<T> {
        self.derivatives.get(order).copied()
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.derivatives
    }
}

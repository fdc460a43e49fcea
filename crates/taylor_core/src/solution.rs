use crate::system::EquationSystem;
use crate::traits::Scalar;
use serde::Serialize;

/// Recorded trajectories of a solved system.
///
/// `dimensions[i][k]` is the k-th derivative of dimension `i`, aligned with
/// `time`. Intended for read-only consumers such as plotting front ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution<T> {
    pub order: usize,
    pub time: Vec<T>,
    pub dimensions: Vec<Vec<Vec<T>>>,
}

impl<T: Scalar> Solution<T> {
    pub(crate) fn from_system(system: &EquationSystem<'_, T>) -> Self {
        let dimensions = system
            .dimensions()
            .iter()
            .map(|dimension| dimension.history().to_vec())
            .collect();
        Self {
            order: system.order(),
            time: system.time_series().to_vec(),
            dimensions,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn series(&self, dimension: usize, order: usize) -> Option<&[T]> {
        self.dimensions
            .get(dimension)?
            .get(order)
            .map(Vec::as_slice)
    }

    /// `(t, value)` pairs for one dimension and derivative order.
    pub fn samples(
        &self,
        dimension: usize,
        order: usize,
    ) -> Option<impl Iterator<Item = (T, T)> + '_> {
        let series = self.series(dimension, order)?;
        Some(self.time.iter().copied().zip(series.iter().copied()))
    }
}

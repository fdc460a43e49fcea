use crate::parameters::Parameters;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in an equation system.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Supplies the highest-order derivative of one dimension.
///
/// `t` is the time of the step being computed and `params` is the flat
/// parameter vector `x, dx, ..., y, dy, ...` with stride `order + 1`.
/// Implementations must only read `params`.
pub trait GoverningEquation<T: Scalar> {
    fn evaluate(&self, t: T, params: &Parameters<T>) -> T;
}

impl<T, F> GoverningEquation<T> for F
where
    T: Scalar,
    F: Fn(T, &Parameters<T>) -> T,
{
    fn evaluate(&self, t: T, params: &Parameters<T>) -> T {
        self(t, params)
    }
}

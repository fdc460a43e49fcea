use crate::error::{Result, SolverError};
use crate::traits::Scalar;

/// Time history of every derivative order of one scalar dimension.
///
/// `history[k]` holds the k-th derivative at every recorded step. Orders
/// `0..order` are extrapolated by [`DimensionState::step`]; `history[order]`
/// is written externally with the output of the governing equation.
#[derive(Debug, Clone)]
pub struct DimensionState<T: Scalar> {
    order: usize,
    history: Vec<Vec<T>>,
}

impl<T: Scalar> DimensionState<T> {
    /// Empty histories for orders `0..=order`; `order` must be at least 1.
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(SolverError::InvalidArgument(
                "order must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            order,
            history: vec![Vec::new(); order + 1],
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Sets `[x(t0), x'(t0), ..., x^(order-1)(t0)]`.
    ///
    /// Exactly `order` values are required; nothing is written otherwise.
    pub fn set_initial_conditions(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.order {
            return Err(SolverError::InvalidArgument(format!(
                "expected {} initial conditions, found {}",
                self.order,
                values.len()
            )));
        }
        for (series, &value) in self.history[..self.order].iter_mut().zip(values) {
            match series.first_mut() {
                Some(slot) => *slot = value,
                None => series.push(value),
            }
        }
        Ok(())
    }

    /// Whether `x(t0)` has been written.
    pub fn has_initial_conditions(&self) -> bool {
        !self.history[0].is_empty()
    }

    /// Records the governing-equation output for the step being computed.
    pub fn set_highest_order_derivative(&mut self, value: T) {
        self.history[self.order].push(value);
    }

    /// Index of the next slot `set_highest_order_derivative` will fill.
    pub fn current_step_index(&self) -> usize {
        self.history[self.order].len()
    }

    /// Extrapolates every lower order one step of size `dt` forward.
    ///
    /// For the new step `s`, each order `i < order` becomes
    /// `x_i[s-1] + sum_{j>i} dt^(j-i) / (j-i)! * x_j[s-1]`.
    /// Only values from step `s-1` are read.
    pub fn step(&mut self, dt: T) -> Result<()> {
        let step = self.current_step_index();
        if step == 0 {
            return Err(SolverError::InvalidArgument(
                "cannot step before the highest-order derivative is recorded".to_string(),
            ));
        }
        if let Some(order) = self.history[..self.order]
            .iter()
            .position(|series| series.len() != step)
        {
            return Err(SolverError::InvalidArgument(format!(
                "derivative {order} has {} values but step {step} expects {step}",
                self.history[order].len()
            )));
        }

        let coefficients = taylor_coefficients(dt, self.order);
        let previous = step - 1;
        for i in 0..self.order {
            let mut next = self.history[i][previous];
            for j in (i + 1)..=self.order {
                next = next + coefficients[j - i] * self.history[j][previous];
            }
            self.history[i].push(next);
        }
        Ok(())
    }

    /// `[x, x', ..., x^(order)]` at the latest recorded step.
    ///
    /// Slots that have not been written yet read as NaN.
    pub fn latest_derivative_vector(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.order + 1);
        self.extend_with_latest(&mut out);
        out
    }

    pub(crate) fn history(&self) -> &[Vec<T>] {
        &self.history
    }

    pub(crate) fn extend_with_latest(&self, out: &mut Vec<T>) {
        let step = self.current_step_index().saturating_sub(1);
        out.extend(
            self.history
                .iter()
                .map(|series| series.get(step).copied().unwrap_or_else(T::nan)),
        );
    }

    /// Full recorded series of derivative order `n`, oldest first.
    pub fn nth_derivative(&self, n: usize) -> Result<&[T]> {
        self.history.get(n).map(Vec::as_slice).ok_or_else(|| {
            SolverError::InvalidArgument(format!(
                "derivative order {n} is outside 0..={}",
                self.order
            ))
        })
    }

    /// Empties every order, as after [`DimensionState::new`].
    pub fn reset(&mut self) {
        for series in &mut self.history {
            series.clear();
        }
    }
}

/// `dt^k / k!` for `k` in `0..=order`.
fn taylor_coefficients<T: Scalar>(dt: T, order: usize) -> Vec<T> {
    let mut coefficients = Vec::with_capacity(order + 1);
    coefficients.push(T::one());
    let mut factorial = T::one();
    let mut k = T::zero();
    for n in 1..=order {
        k = k + T::one();
        factorial = factorial * k;
        let exponent = i32::try_from(n).unwrap_or(i32::MAX);
        coefficients.push(dt.powi(exponent) / factorial);
    }
    coefficients
}

use crate::dimension::DimensionState;
use crate::error::{Result, SolverError, ValidationFailure};
use crate::parameters::Parameters;
use crate::schedule::Schedule;
use crate::solution::Solution;
use crate::traits::{GoverningEquation, Scalar};
use log::{debug, trace, warn};
use std::fmt;

/// Type-erased governing equation that may borrow caller state for `'a`.
pub type BoxedEquation<'a, T> = Box<dyn GoverningEquation<T> + 'a>;

/// A coupled system of `dimension_count` scalar ODEs sharing one order.
///
/// Every dimension is driven by its own governing equation, which receives
/// the flat parameter vector of the whole system and returns that
/// dimension's highest-order derivative. Equations may borrow caller state
/// for `'a`.
pub struct EquationSystem<'a, T: Scalar = f64> {
    order: usize,
    dimensions: Vec<DimensionState<T>>,
    equations: Vec<Option<BoxedEquation<'a, T>>>,
    time: Vec<T>,
}

impl<'a, T: Scalar> EquationSystem<'a, T> {
    /// Allocates `dimension_count` empty dimensions of the given `order`.
    pub fn new(dimension_count: usize, order: usize) -> Result<Self> {
        if dimension_count == 0 {
            return Err(SolverError::InvalidArgument(
                "an equation system needs at least one dimension".to_string(),
            ));
        }
        let dimensions = (0..dimension_count)
            .map(|_| DimensionState::new(order))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            order,
            dimensions,
            equations: (0..dimension_count).map(|_| None).collect(),
            time: Vec::new(),
        })
    }

    pub(crate) fn dimensions(&self) -> &[DimensionState<T>] {
        &self.dimensions
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Read access to one dimension's full history.
    pub fn dimension(&self, index: usize) -> Result<&DimensionState<T>> {
        self.check_index(index)?;
        Ok(&self.dimensions[index])
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.dimensions.len() {
            Ok(())
        } else {
            Err(SolverError::OutOfRange {
                index,
                count: self.dimensions.len(),
            })
        }
    }

    /// Sets `[x(t0), ..., x^(order-1)(t0)]` for one dimension.
    pub fn set_initial_conditions(&mut self, dimension: usize, values: &[T]) -> Result<()> {
        self.check_index(dimension)?;
        self.dimensions[dimension].set_initial_conditions(values)
    }

    /// Registers `f(t, params)` as the governing equation of `dimension`.
    ///
    /// A dimension accepts one equation; later registrations are rejected
    /// and the first one is kept.
    pub fn set_governing_equation<F>(&mut self, dimension: usize, f: F) -> Result<()>
    where
        F: Fn(T, &Parameters<T>) -> T + 'a,
    {
        self.set_boxed_governing_equation(dimension, Box::new(f))
    }

    /// Same as [`EquationSystem::set_governing_equation`] for an already boxed equation.
    pub fn set_boxed_governing_equation(
        &mut self,
        dimension: usize,
        equation: BoxedEquation<'a, T>,
    ) -> Result<()> {
        self.check_index(dimension)?;
        let slot = &mut self.equations[dimension];
        if slot.is_some() {
            return Err(SolverError::AlreadyRegistered { dimension });
        }
        *slot = Some(equation);
        Ok(())
    }

    /// Concatenation of every dimension's latest derivative vector.
    pub fn assemble_parameters(&self) -> Parameters<T> {
        let mut params = Parameters::with_capacity(self.dimensions.len(), self.order + 1);
        assemble_into(&self.dimensions, &mut params);
        params
    }

    /// Checks that every dimension can be solved from `t0`.
    ///
    /// Initial conditions and registrations are checked for all dimensions
    /// before any equation is evaluated, so a missing value in a later
    /// dimension is reported against that dimension. Each equation is then
    /// evaluated once at `t0`; its result is not inspected.
    pub fn validate(&self, t0: T) -> Result<()> {
        for (dimension, (state, equation)) in
            self.dimensions.iter().zip(&self.equations).enumerate()
        {
            if !state.has_initial_conditions() {
                return Err(reject(dimension, ValidationFailure::MissingInitialConditions));
            }
            if equation.is_none() {
                return Err(reject(dimension, ValidationFailure::MissingGoverningEquation));
            }
        }

        // Any returned value is accepted, NaN and infinities included.
        let params = self.assemble_parameters();
        for (dimension, equation) in self.equations.iter().enumerate() {
            if let Some(equation) = equation {
                let value = equation.evaluate(t0, &params);
                trace!("Dimension {dimension} evaluates to {value:?} at t0 = {t0:?}");
            }
        }
        Ok(())
    }

    /// Integrates from `t0` to `tf` with fixed step `dt`.
    pub fn solve(&mut self, t0: T, dt: T, tf: T) -> Result<()> {
        let schedule = Schedule::new(t0, dt, tf)?;
        self.solve_schedule(&schedule)
    }

    /// Integrates over `schedule`. Fails before any mutation if the schedule
    /// or the configuration is invalid, or if a solution is already recorded.
    pub fn solve_schedule(&mut self, schedule: &Schedule<T>) -> Result<()> {
        schedule.validate()?;
        if !self.time.is_empty() || self.dimensions.iter().any(|d| d.current_step_index() > 0) {
            return Err(SolverError::InvalidArgument(
                "system already holds a solution; reset it before solving again".to_string(),
            ));
        }
        self.validate(schedule.t0)?;

        debug!(
            "Solving {} dimension(s) of order {} over {:?}",
            self.dimensions.len(),
            self.order,
            schedule
        );

        let Self {
            order,
            dimensions,
            equations,
            time,
        } = self;
        let equations = equations
            .iter()
            .enumerate()
            .map(|(dimension, equation)| {
                equation.as_deref().ok_or(SolverError::Validation {
                    dimension,
                    reason: ValidationFailure::MissingGoverningEquation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Seed the highest order at t0 from the initial conditions alone.
        let mut params = Parameters::with_capacity(dimensions.len(), *order + 1);
        assemble_into(dimensions, &mut params);
        for (state, equation) in dimensions.iter_mut().zip(&equations) {
            state.set_highest_order_derivative(equation.evaluate(schedule.t0, &params));
        }
        time.push(schedule.t0);

        for t in schedule.times().skip(1) {
            // Earlier dimensions already hold step s when later ones assemble.
            for (index, equation) in equations.iter().enumerate() {
                assemble_into(dimensions, &mut params);
                let state = &mut dimensions[index];
                state.step(schedule.dt)?;
                state.set_highest_order_derivative(equation.evaluate(t, &params));
            }
            time.push(t);
            trace!("Completed step {} at t = {:?}", time.len() - 1, t);
        }

        debug!("Recorded {} time points", time.len());
        Ok(())
    }

    /// Full recorded series of one derivative order of one dimension.
    pub fn data_for(&self, dimension: usize, order: usize) -> Result<&[T]> {
        self.check_index(dimension)?;
        self.dimensions[dimension].nth_derivative(order)
    }

    /// Time of every recorded step, aligned with [`EquationSystem::data_for`].
    pub fn time_series(&self) -> &[T] {
        &self.time
    }

    /// Copies the recorded trajectories into a serializable snapshot.
    pub fn solution(&self) -> Solution<T> {
        Solution::from_system(self)
    }

    /// Clears the time axis and every dimension's history.
    ///
    /// Registered governing equations are kept.
    pub fn reset(&mut self) {
        self.time.clear();
        for dimension in &mut self.dimensions {
            dimension.reset();
        }
    }
}

fn assemble_into<T: Scalar>(dimensions: &[DimensionState<T>], params: &mut Parameters<T>) {
    let buffer = params.buffer_mut();
    buffer.clear();
    for dimension in dimensions {
        dimension.extend_with_latest(buffer);
    }
}

fn reject(dimension: usize, reason: ValidationFailure) -> SolverError {
    warn!("Dimension {dimension} failed validation: {reason}");
    SolverError::Validation { dimension, reason }
}

impl<T: Scalar> fmt::Debug for EquationSystem<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<bool> = self.equations.iter().map(Option::is_some).collect();
        f.debug_struct("EquationSystem")
            .field("order", &self.order)
            .field("dimensions", &self.dimensions)
            .field("registered", &registered)
            .field("time", &self.time)
            .finish()
    }
}

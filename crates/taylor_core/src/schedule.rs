use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use serde::{Deserialize, Serialize};

/// Fixed-step run configuration: start time, timestep and end time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule<T> {
    pub t0: T,
    pub dt: T,
    pub tf: T,
}

impl<T: Scalar> Schedule<T> {
    /// Builds a schedule, failing with `InvalidArgument` if it cannot run.
    pub fn new(t0: T, dt: T, tf: T) -> Result<Self> {
        let schedule = Self { t0, dt, tf };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Requires finite values, a positive `dt`, and a `dt` large enough to
    /// move `t` anywhere between `t0` and `tf`.
    pub fn validate(&self) -> Result<()> {
        if !(self.t0.is_finite() && self.dt.is_finite() && self.tf.is_finite()) {
            return Err(SolverError::InvalidArgument(format!(
                "schedule values must be finite (t0 = {:?}, dt = {:?}, tf = {:?})",
                self.t0, self.dt, self.tf
            )));
        }
        if self.dt <= T::zero() {
            return Err(SolverError::InvalidArgument(format!(
                "step size dt must be positive, found {:?}",
                self.dt
            )));
        }
        // |t| is largest at one of the endpoints, so is the float spacing.
        if self.tf > self.t0 && (self.t0 + self.dt == self.t0 || self.tf + self.dt == self.tf) {
            return Err(SolverError::InvalidArgument(format!(
                "step size dt = {:?} is below the float spacing between t0 = {:?} and tf = {:?}",
                self.dt, self.t0, self.tf
            )));
        }
        Ok(())
    }

    /// Time points `t0, t0 + dt, ...` up to `tf`.
    ///
    /// `t` is accumulated by repeated addition. The end test allows an
    /// overshoot of `dt * sqrt(eps)` so a `tf` that is a whole number of
    /// steps away is still reached.
    pub fn times(&self) -> ScheduleTimes<T> {
        ScheduleTimes {
            next: self.t0,
            dt: self.dt,
            limit: self.tf + self.dt * T::epsilon().sqrt(),
            first: true,
            stalled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleTimes<T> {
    next: T,
    dt: T,
    limit: T,
    first: bool,
    stalled: bool,
}

impl<T: Scalar> Iterator for ScheduleTimes<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        // t0 is always recorded, even when tf < t0.
        if self.first {
            self.first = false;
        } else if self.stalled || self.next > self.limit {
            return None;
        }
        let t = self.next;
        self.next = t + self.dt;
        // A t that no longer advances is yielded once.
        self.stalled = self.next <= t;
        Some(t)
    }
}

//! The `taylor_core` crate integrates coupled systems of ordinary differential
//! equations of any order with a fixed-step truncated Taylor-series scheme.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `GoverningEquation` (per-dimension callbacks).
//! - **DimensionState**: time history of every derivative order of one scalar dimension.
//! - **EquationSystem**: validation, parameter assembly and the lock-step solve loop.
//! - **Schedule** / **Solution**: serde-friendly run configuration and results.
pub mod dimension;
pub mod error;
pub mod parameters;
pub mod schedule;
pub mod solution;
pub mod system;
pub mod traits;

#[cfg(test)]
mod scenarios;

pub use dimension::DimensionState;
pub use error::{Result, SolverError, ValidationFailure};
pub use parameters::{DimensionView, Parameters};
pub use schedule::Schedule;
pub use solution::Solution;
pub use system::{BoxedEquation, EquationSystem};
pub use traits::{GoverningEquation, Scalar};

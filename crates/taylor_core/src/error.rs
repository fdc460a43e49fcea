use thiserror::Error;

pub type Result<T, E = SolverError> = std::result::Result<T, E>;

/// The precondition a dimension failed during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("initial conditions not set")]
    MissingInitialConditions,
    #[error("there is no governing equation")]
    MissingGoverningEquation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("dimension {index} does not exist (system has {count} dimensions)")]
    OutOfRange { index: usize, count: usize },
    #[error("a governing equation is already registered for dimension {dimension}")]
    AlreadyRegistered { dimension: usize },
    #[error("dimension {dimension} failed validation: {reason}")]
    Validation {
        dimension: usize,
        reason: ValidationFailure,
    },
}

//! Error type shared by every fallible operation in the crate.
use thiserror::Error;

/// Local, synchronous failures returned to the caller. Nothing in the crate retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpvarError {
    /// A caller supplied parameter is outside of its domain, e.g. an elite fraction that selects
    /// no samples, a negative threshold or an empty sample budget.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The model or the fixed variables disagree with each other, e.g. a coupling referencing an
    /// index past the variable count, a non-finite coefficient or a variable fixed twice.
    #[error("Inconsistent model: {0}")]
    InconsistentModel(String),

    /// An assignment does not cover a variable it is required to cover.
    #[error("Variable {0} is missing from the assignment")]
    MissingVariable(usize),
}

pub type SpvarResult<T> = Result<T, SpvarError>;

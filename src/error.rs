//! Errors produced while loading instances and solving them.

use std::time::Duration;

use thiserror::Error;

use crate::Solution;

#[derive(Error, Debug)]
pub enum SolveError {
    /// Malformed or out-of-range input. Raised before any solving starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unable to allocate {what} ({count} elements)")]
    AllocationFailure { what: &'static str, count: usize },

    /// The exact backend proved there is no dominating set within `bound`.
    #[error("no dominating set with at most {bound} vertices exists")]
    Infeasible { bound: usize },

    /// The exact backend ran out of time. `best` is the smallest dominating set found so far,
    /// if any.
    #[error("exact search exceeded its budget of {budget:?}")]
    Timeout {
        budget: Duration,
        best: Option<Solution>,
    },

    #[error("unable to build worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SolveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SolveError::InvalidInput(msg.into())
    }
}

/// Reserves exactly `count` elements, reporting failure as [`SolveError::AllocationFailure`].
pub(crate) fn try_vec<T>(what: &'static str, count: usize) -> Result<Vec<T>, SolveError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(count)
        .map_err(|_| SolveError::AllocationFailure { what, count })?;
    Ok(vec)
}

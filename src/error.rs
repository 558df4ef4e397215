//! Error types for the ACO engine.
//!
//! Only malformed input at the boundary is reported as an error.
//! Numerical edge cases inside the loop (zero cost, zero pheromone)
//! have fallbacks and never surface here.

use thiserror::Error;

/// Errors produced by `u-aco`.
#[derive(Debug, Error)]
pub enum AcoError {
    /// Malformed cost matrix, out-of-domain parameters, or mismatched
    /// dimensions. Detected before any round runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation was called in a state where it has no defined result,
    /// e.g. asking for transition probabilities with every city visited.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Text input (cost matrix or parameter file) could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcoError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        AcoError::InvalidInput(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        AcoError::InvalidState(message.into())
    }
}

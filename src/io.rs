//! Text input for cost matrices and run parameters.
//!
//! # Cost matrix format
//!
//! One row per line, whitespace-separated numbers. Blank lines are
//! skipped.
//!
//! ```text
//! 0 10 15 20
//! 10 0 35 25
//! 15 35 0 30
//! 20 25 30 0
//! ```
//!
//! # Parameter format
//!
//! One `key=value` pair per line. Blank lines and lines starting with `#`
//! are skipped. Keys not listed keep their [`AcoConfig::default`] value.
//!
//! ```text
//! n_ants=10
//! n_iterations=100
//! decay=0.1
//! alpha=1
//! beta=2
//! seed=42
//! ```

use crate::aco::{AcoConfig, CostMatrix};
use crate::error::AcoError;
use std::path::Path;

/// Parses a cost matrix from text.
///
/// # Errors
///
/// [`AcoError::Parse`] for a token that is not a number, and
/// [`AcoError::InvalidInput`] if the parsed matrix is not a valid
/// [`CostMatrix`].
pub fn parse_cost_matrix(text: &str) -> Result<CostMatrix, AcoError> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|e| AcoError::Parse {
                    line: idx + 1,
                    message: format!("invalid cost '{token}': {e}"),
                })
            })
            .collect::<Result<Vec<f64>, AcoError>>()?;
        rows.push(row);
    }

    CostMatrix::new(rows)
}

/// Reads a cost matrix file. See [`parse_cost_matrix`].
pub fn read_cost_matrix(path: impl AsRef<Path>) -> Result<CostMatrix, AcoError> {
    let text = std::fs::read_to_string(path)?;
    parse_cost_matrix(&text)
}

/// Parses run parameters from `key=value` lines.
///
/// Counts may be written as `10` or `10.0` but must be non-negative
/// whole numbers. The result is validated.
///
/// # Errors
///
/// [`AcoError::Parse`] for malformed lines or values, and
/// [`AcoError::InvalidInput`] for out-of-domain values.
pub fn parse_parameters(text: &str) -> Result<AcoConfig, AcoError> {
    let mut config = AcoConfig::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| AcoError::Parse {
            line: line_no,
            message: format!("expected key=value, got '{line}'"),
        })?;
        let key = key.trim();
        let value = value.trim();

        match key {
            "n_ants" => config.n_ants = parse_count(key, value, line_no)?,
            "n_iterations" => config.n_iterations = parse_count(key, value, line_no)?,
            "decay" => config.decay = parse_number(key, value, line_no)?,
            "alpha" => config.alpha = parse_number(key, value, line_no)?,
            "beta" => config.beta = parse_number(key, value, line_no)?,
            "seed" => {
                let seed = value.parse::<u64>().map_err(|e| AcoError::Parse {
                    line: line_no,
                    message: format!("invalid seed '{value}': {e}"),
                })?;
                config.seed = Some(seed);
            }
            _ => tracing::warn!(key, line = line_no, "ignoring unknown parameter"),
        }
    }

    config.validate()?;
    Ok(config)
}

/// Reads a parameter file. See [`parse_parameters`].
pub fn read_parameters(path: impl AsRef<Path>) -> Result<AcoConfig, AcoError> {
    let text = std::fs::read_to_string(path)?;
    parse_parameters(&text)
}

fn parse_number(key: &str, value: &str, line: usize) -> Result<f64, AcoError> {
    value.parse::<f64>().map_err(|e| AcoError::Parse {
        line,
        message: format!("invalid value for {key} '{value}': {e}"),
    })
}

fn parse_count(key: &str, value: &str, line: usize) -> Result<usize, AcoError> {
    let n = parse_number(key, value, line)?;
    if !n.is_finite() || n < 0.0 {
        return Err(AcoError::invalid_input(format!(
            "{key} must be a non-negative count, got {value}"
        )));
    }
    if n >= usize::MAX as f64 {
        return Err(AcoError::Parse {
            line,
            message: format!("{key} is too large, got {value}"),
        });
    }
    if n.fract() != 0.0 {
        return Err(AcoError::Parse {
            line,
            message: format!("{key} must be a whole number, got {value}"),
        });
    }
    Ok(n as usize)
}

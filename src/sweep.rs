//! Parameter sensitivity sweeps.
//!
//! Thin orchestration over [`AntColony::solve`]: each grid point runs a
//! fresh engine (fresh pheromone, fresh incumbent) with no observer, and
//! records elapsed time and best cost. [`compare_convergence`] records
//! the per-round incumbent trajectory of several labelled configurations.

use crate::aco::{AcoConfig, AntColony, CostMatrix};
use crate::error::AcoError;
use std::time::Duration;

/// The run parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SweepParameter {
    /// `n_ants`. Grid values must be positive whole numbers.
    AgentCount,
    /// `decay`.
    Decay,
    /// `alpha`.
    Alpha,
    /// `beta`.
    Beta,
}

impl SweepParameter {
    /// Parameter name as written in parameter files.
    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::AgentCount => "n_ants",
            SweepParameter::Decay => "decay",
            SweepParameter::Alpha => "alpha",
            SweepParameter::Beta => "beta",
        }
    }

    /// Standard grid for this parameter.
    ///
    /// - agents: 5, 10, ..., 30
    /// - decay: 0.1 to 0.9 in 9 steps
    /// - alpha, beta: 0.5 to 3.0 in 6 steps
    pub fn default_grid(self) -> Vec<f64> {
        match self {
            SweepParameter::AgentCount => (1..=6).map(|k| (k * 5) as f64).collect(),
            SweepParameter::Decay => linspace(0.1, 0.9, 9),
            SweepParameter::Alpha | SweepParameter::Beta => linspace(0.5, 3.0, 6),
        }
    }

    /// Returns `base` with this parameter set to `value`.
    ///
    /// The result is not validated; [`AntColony::new`] does that.
    pub fn apply(self, base: &AcoConfig, value: f64) -> Result<AcoConfig, AcoError> {
        let config = base.clone();
        Ok(match self {
            SweepParameter::AgentCount => {
                if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
                    return Err(AcoError::invalid_input(format!(
                        "agent count must be a positive whole number, got {value}"
                    )));
                }
                config.with_ants(value as usize)
            }
            SweepParameter::Decay => config.with_decay(value),
            SweepParameter::Alpha => config.with_alpha(value),
            SweepParameter::Beta => config.with_beta(value),
        })
    }
}

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepPoint {
    /// Parameter value used.
    pub value: f64,
    /// Solve time.
    pub elapsed: Duration,
    /// Best tour cost found.
    pub best_cost: f64,
}

/// Incumbent cost per round for one labelled configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceTrace {
    pub label: String,
    pub config: AcoConfig,
    pub cost_history: Vec<f64>,
}

/// Solves once per value of `parameter`, everything else taken from `base`.
///
/// # Errors
///
/// [`AcoError::InvalidInput`] if any grid value produces an invalid
/// configuration. Nothing is run in that case.
pub fn run_sweep(
    costs: &CostMatrix,
    base: &AcoConfig,
    parameter: SweepParameter,
    values: &[f64],
) -> Result<Vec<SweepPoint>, AcoError> {
    let configs = values
        .iter()
        .map(|&v| {
            let config = parameter.apply(base, v)?;
            config.validate()?;
            Ok(config)
        })
        .collect::<Result<Vec<_>, AcoError>>()?;

    let mut points = Vec::with_capacity(values.len());
    for (&value, config) in values.iter().zip(configs) {
        let result = AntColony::new(costs, config)?.solve()?;
        tracing::trace!(
            parameter = parameter.name(),
            value,
            best_cost = result.best_cost,
            "sweep point"
        );
        points.push(SweepPoint {
            value,
            elapsed: result.elapsed,
            best_cost: result.best_cost,
        });
    }

    Ok(points)
}

/// Solves each labelled configuration and collects its trajectory.
pub fn compare_convergence(
    costs: &CostMatrix,
    runs: &[(String, AcoConfig)],
) -> Result<Vec<ConvergenceTrace>, AcoError> {
    runs.iter()
        .map(|(label, config)| {
            let result = AntColony::new(costs, config.clone())?.solve()?;
            Ok(ConvergenceTrace {
                label: label.clone(),
                config: config.clone(),
                cost_history: result.cost_history,
            })
        })
        .collect()
}

/// Four reference configurations for [`compare_convergence`], keeping
/// `base`'s iteration count and seed:
///
/// | ants | decay | alpha | beta |
/// |------|-------|-------|------|
/// | 5    | 0.1   | 1     | 2    |
/// | 10   | 0.1   | 1     | 2    |
/// | 10   | 0.2   | 1     | 2    |
/// | 10   | 0.1   | 2     | 1    |
pub fn default_convergence_set(base: &AcoConfig) -> Vec<(String, AcoConfig)> {
    [
        (5, 0.1, 1.0, 2.0),
        (10, 0.1, 1.0, 2.0),
        (10, 0.2, 1.0, 2.0),
        (10, 0.1, 2.0, 1.0),
    ]
    .into_iter()
    .map(|(ants, decay, alpha, beta)| {
        let label = format!("ants={ants}, decay={decay}, alpha={alpha}, beta={beta}");
        let config = base
            .clone()
            .with_ants(ants)
            .with_decay(decay)
            .with_alpha(alpha)
            .with_beta(beta);
        (label, config)
    })
    .collect()
}

/// `steps` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            let mut values: Vec<f64> = (0..steps).map(|i| start + i as f64 * step).collect();
            values[steps - 1] = end;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_city() -> CostMatrix {
        CostMatrix::new(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let v = linspace(0.5, 3.0, 6);
        assert_eq!(v.len(), 6);
        for (got, want) in v.iter().zip([0.5, 1.0, 1.5, 2.0, 2.5, 3.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_default_grids() {
        assert_eq!(
            SweepParameter::AgentCount.default_grid(),
            vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0]
        );
        let decay = SweepParameter::Decay.default_grid();
        assert_eq!(decay.len(), 9);
        assert!((decay[0] - 0.1).abs() < 1e-12);
        assert!((decay[8] - 0.9).abs() < 1e-12);
        assert_eq!(SweepParameter::Beta.default_grid().len(), 6);
    }

    #[test]
    fn test_apply() {
        let base = AcoConfig::default();
        assert_eq!(
            SweepParameter::AgentCount.apply(&base, 15.0).unwrap().n_ants,
            15
        );
        assert!(SweepParameter::AgentCount.apply(&base, 2.5).is_err());
        assert!(SweepParameter::AgentCount.apply(&base, 0.0).is_err());
        let c = SweepParameter::Alpha.apply(&base, 2.5).unwrap();
        assert!((c.alpha - 2.5).abs() < 1e-12);
        assert!((c.beta - base.beta).abs() < 1e-12);
    }

    #[test]
    fn test_run_sweep_agent_count() {
        let costs = four_city();
        let base = AcoConfig::default().with_iterations(20).with_seed(42);
        let grid = SweepParameter::AgentCount.default_grid();
        let points = run_sweep(&costs, &base, SweepParameter::AgentCount, &grid).unwrap();

        assert_eq!(points.len(), grid.len());
        for (point, &value) in points.iter().zip(&grid) {
            assert_eq!(point.value, value);
            assert!(point.best_cost >= 80.0);
        }
    }

    #[test]
    fn test_run_sweep_decay_finds_optimum() {
        let costs = four_city();
        let base = AcoConfig::default().with_iterations(50).with_seed(42);
        let grid = SweepParameter::Decay.default_grid();
        let points = run_sweep(&costs, &base, SweepParameter::Decay, &grid).unwrap();

        assert!(points.iter().all(|p| p.best_cost == 80.0));
    }

    #[test]
    fn test_run_sweep_rejects_bad_grid_before_running() {
        let costs = four_city();
        let base = AcoConfig::default().with_iterations(5);
        let err = run_sweep(&costs, &base, SweepParameter::Decay, &[0.5, 1.5]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidInput(_)));
    }

    #[test]
    fn test_compare_convergence() {
        let costs = four_city();
        let base = AcoConfig::default().with_iterations(30).with_seed(1);
        let runs = default_convergence_set(&base);
        assert_eq!(runs.len(), 4);

        let traces = compare_convergence(&costs, &runs).unwrap();
        assert_eq!(traces.len(), 4);
        for trace in &traces {
            assert_eq!(trace.cost_history.len(), 30);
            for w in trace.cost_history.windows(2) {
                assert!(w[1] <= w[0]);
            }
        }
        assert_eq!(traces[0].config.n_ants, 5);
        assert!(traces[3].label.contains("alpha=2"));
    }
}

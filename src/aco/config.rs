//! ACO run parameters.

use crate::error::AcoError;

/// Configuration for one ACO solve.
///
/// # Examples
///
/// ```
/// use u_aco::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ants(20)
///     .with_iterations(200)
///     .with_decay(0.2)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of agents (ants) constructing a tour each round.
    pub n_ants: usize,

    /// Number of rounds. 0 is allowed and completes immediately.
    pub n_iterations: usize,

    /// Evaporation rate in (0, 1). Each round every pheromone entry is
    /// multiplied by `1 - decay` before deposits.
    pub decay: f64,

    /// Pheromone weight exponent. 0 ignores the learned trails.
    pub alpha: f64,

    /// Heuristic (inverse cost) weight exponent. 0 ignores edge costs.
    pub beta: f64,

    /// Random seed for reproducibility. `None` draws a fresh seed per solve.
    pub seed: Option<u64>,

    /// Construct the agents of a round on rayon.
    ///
    /// Only has an effect with the `parallel` feature. Results are
    /// identical to sequential construction for the same seed.
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            n_ants: 10,
            n_iterations: 100,
            decay: 0.1,
            alpha: 1.0,
            beta: 2.0,
            seed: None,
            parallel: false,
        }
    }
}

impl AcoConfig {
    pub fn with_ants(mut self, n: usize) -> Self {
        self.n_ants = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel per-agent construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AcoError> {
        if self.n_ants == 0 {
            return Err(AcoError::invalid_input("n_ants must be at least 1"));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(AcoError::invalid_input(format!(
                "decay must be in (0, 1), got {}",
                self.decay
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(AcoError::invalid_input(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(AcoError::invalid_input(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

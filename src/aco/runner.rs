//! ACO optimization loop.
//!
//! # Algorithm
//!
//! 1. Reset pheromone to the initial level
//! 2. At each round:
//!    a. Check the cancellation predicate; stop if it fires
//!    b. Every agent constructs a tour on its own random stream
//!    c. Replace the incumbent if the round's best tour is strictly better
//!    d. Evaporate, then deposit on every agent's tour
//!    e. Notify the observer with a copy of the pheromone matrix
//! 3. Terminate after `n_iterations` rounds or on cancellation

use super::config::AcoConfig;
use super::construct::TourConstructor;
use super::pheromone::{PheromoneMatrix, PheromoneModel};
use super::types::{CostMatrix, Incumbent, RoundObserver, Tour};
use crate::error::AcoError;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use u_numflow::random::create_rng;

/// Lifecycle of an [`AntColony`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveState {
    /// Constructed, no solve started yet.
    Ready,
    /// A solve is in progress.
    Running,
    /// The last solve ran all of its rounds.
    Completed,
    /// The last solve stopped because the cancellation predicate fired.
    Cancelled,
}

/// Result of one solve call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Best tour found. `None` if no round completed.
    pub best_tour: Option<Tour>,

    /// Cost of `best_tour`, or `f64::INFINITY` when there is none.
    pub best_cost: f64,

    /// Round (0-based) in which the best tour was found.
    pub best_round: Option<usize>,

    /// Wall-clock time from the start of the first round to completion
    /// or cancellation.
    pub elapsed: Duration,

    /// Number of rounds fully applied.
    pub rounds_completed: usize,

    /// Whether the cancellation predicate stopped the run.
    pub cancelled: bool,

    /// Incumbent cost after each completed round.
    pub cost_history: Vec<f64>,
}

/// Ant Colony Optimization engine over one cost matrix.
///
/// Every solve starts from a fresh pheromone matrix and an empty
/// incumbent, so repeated calls are independent. Several engines may
/// borrow the same [`CostMatrix`].
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoConfig, AntColony, CostMatrix};
///
/// let costs = CostMatrix::new(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let config = AcoConfig::default().with_iterations(50).with_seed(42);
///
/// let mut colony = AntColony::new(&costs, config).unwrap();
/// let result = colony.solve().unwrap();
/// assert_eq!(result.best_cost, 80.0);
/// ```
pub struct AntColony<'a> {
    costs: &'a CostMatrix,
    config: AcoConfig,
    pheromone: PheromoneModel,
    state: SolveState,
    observer: Option<Box<dyn RoundObserver + 'a>>,
}

impl<'a> AntColony<'a> {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidInput`] if the configuration is out of domain.
    pub fn new(costs: &'a CostMatrix, config: AcoConfig) -> Result<Self, AcoError> {
        config.validate()?;
        let pheromone = PheromoneModel::new(costs.len(), config.alpha, config.beta);

        Ok(Self {
            costs,
            config,
            pheromone,
            state: SolveState::Ready,
            observer: None,
        })
    }

    /// Attaches an observer notified after every round.
    pub fn with_observer<O: RoundObserver + 'a>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    /// Pheromone matrix as left by the last round applied.
    pub fn pheromone(&self) -> &PheromoneMatrix {
        self.pheromone.matrix()
    }

    /// Runs all rounds without cancellation.
    pub fn solve(&mut self) -> Result<AcoResult, AcoError> {
        self.solve_with_cancel(|| false)
    }

    /// Runs until `flag` is set or all rounds complete.
    ///
    /// The flag is checked at each round boundary, so cancellation takes
    /// effect after at most one more round.
    pub fn solve_with_flag(&mut self, flag: &AtomicBool) -> Result<AcoResult, AcoError> {
        self.solve_with_cancel(|| flag.load(Ordering::Relaxed))
    }

    /// Runs until `cancel` returns `true` or all rounds complete.
    ///
    /// `cancel` is called once before every round; when it returns
    /// `true` that round is not started.
    ///
    /// A solve that fails part-way leaves the engine in
    /// [`SolveState::Cancelled`].
    pub fn solve_with_cancel<C>(&mut self, cancel: C) -> Result<AcoResult, AcoError>
    where
        C: FnMut() -> bool,
    {
        let outcome = self.run_rounds(cancel);
        if outcome.is_err() {
            self.state = SolveState::Cancelled;
        }
        outcome
    }

    fn run_rounds<C>(&mut self, mut cancel: C) -> Result<AcoResult, AcoError>
    where
        C: FnMut() -> bool,
    {
        let mut rng = match self.config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        self.pheromone.reset();
        self.state = SolveState::Running;

        let mut incumbent: Option<Incumbent> = None;
        let mut cost_history = Vec::new();
        let mut cancelled = false;

        let start = Instant::now();

        for round in 0..self.config.n_iterations {
            if cancel() {
                tracing::debug!(round, "solve cancelled");
                cancelled = true;
                break;
            }

            // One stream per agent, drawn in agent order.
            let seeds: Vec<u64> = (0..self.config.n_ants)
                .map(|_| rng.random::<u64>())
                .collect();
            let (tours, costs): (Vec<Tour>, Vec<f64>) =
                self.construct_round(&seeds)?.into_iter().unzip();

            let round_best = costs
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));

            if let Some((agent, &cost)) = round_best {
                let improves = incumbent.as_ref().is_none_or(|inc| cost < inc.cost);
                if improves {
                    incumbent = Some(Incumbent {
                        tour: tours[agent].clone(),
                        cost,
                        round,
                    });
                }
            }

            self.pheromone
                .evaporate_and_deposit(&tours, &costs, self.config.decay)?;

            let best_cost = incumbent.as_ref().map_or(f64::INFINITY, |inc| inc.cost);
            cost_history.push(best_cost);

            tracing::debug!(
                round,
                round_best = round_best.map_or(f64::INFINITY, |(_, &c)| c),
                best_cost,
                "round complete"
            );

            if let Some(observer) = self.observer.as_mut() {
                observer.on_round(
                    round,
                    self.pheromone.snapshot(),
                    &tours,
                    &costs,
                    incumbent.as_ref(),
                );
            }
        }

        let elapsed = start.elapsed();
        self.state = if cancelled {
            SolveState::Cancelled
        } else {
            SolveState::Completed
        };

        let rounds_completed = cost_history.len();
        let best_cost = incumbent.as_ref().map_or(f64::INFINITY, |inc| inc.cost);

        tracing::info!(
            rounds = rounds_completed,
            best_cost,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            cancelled,
            "solve finished"
        );

        let (best_tour, best_round) = match incumbent {
            Some(inc) => (Some(inc.tour), Some(inc.round)),
            None => (None, None),
        };

        Ok(AcoResult {
            best_tour,
            best_cost,
            best_round,
            elapsed,
            rounds_completed,
            cancelled,
            cost_history,
        })
    }

    /// Constructs one tour per seed. All constructions read the same
    /// pheromone state; nothing is written until the round is complete.
    fn construct_round(&self, seeds: &[u64]) -> Result<Vec<(Tour, f64)>, AcoError> {
        let pheromone = &self.pheromone;
        let costs = self.costs;
        let build = |&seed: &u64| {
            let mut rng = create_rng(seed);
            TourConstructor::construct(pheromone, costs, &mut rng)
        };

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return seeds.par_iter().map(build).collect();
            }
        }

        seeds.iter().map(build).collect()
    }
}

//! Stochastic tour construction for a single agent.

use super::pheromone::PheromoneModel;
use super::types::{CostMatrix, Tour};
use crate::error::AcoError;
use rand::Rng;

/// Builds one complete tour per call using the proportional transition
/// rule of [`PheromoneModel::transition_probabilities`].
///
/// Holds no state; every draw comes from the caller's random source, so
/// independent agents can run on independent streams.
pub struct TourConstructor;

impl TourConstructor {
    /// Constructs a closed tour and its cost in a single pass.
    ///
    /// Starts from a uniformly random city, then repeatedly samples the
    /// next city from the transition probabilities of the current one
    /// until every city is on the tour.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidInput`] if the matrix has fewer than 2 cities
    /// or the pheromone model has a different dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_aco::aco::{CostMatrix, PheromoneModel, TourConstructor};
    ///
    /// let costs = CostMatrix::new(vec![
    ///     vec![0.0, 1.0, 2.0],
    ///     vec![1.0, 0.0, 1.5],
    ///     vec![2.0, 1.5, 0.0],
    /// ]).unwrap();
    /// let model = PheromoneModel::new(3, 1.0, 2.0);
    /// let mut rng = u_numflow::random::create_rng(7);
    ///
    /// let (tour, cost) = TourConstructor::construct(&model, &costs, &mut rng).unwrap();
    /// assert_eq!(tour.len(), 3);
    /// assert!((cost - 4.5).abs() < 1e-12);
    /// ```
    pub fn construct<R: Rng>(
        pheromone: &PheromoneModel,
        costs: &CostMatrix,
        rng: &mut R,
    ) -> Result<(Tour, f64), AcoError> {
        let n = costs.len();
        if n < 2 {
            return Err(AcoError::invalid_input(format!(
                "tour construction needs at least 2 cities, got {n}"
            )));
        }
        if pheromone.matrix().len() != n {
            return Err(AcoError::invalid_input(format!(
                "pheromone matrix has {} cities, cost matrix has {n}",
                pheromone.matrix().len()
            )));
        }

        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        let start = rng.random_range(0..n);
        tour.push(start);
        visited[start] = true;

        let mut current = start;
        let mut cost = 0.0;

        while tour.len() < n {
            let probabilities = pheromone.transition_probabilities(costs, current, &visited)?;
            let next = sample(&probabilities, rng).ok_or_else(|| {
                AcoError::invalid_state("transition probabilities have no positive entry")
            })?;

            cost += costs.get(current, next);
            tour.push(next);
            visited[next] = true;
            current = next;
        }

        cost += costs.get(current, start);

        Ok((tour, cost))
    }
}

/// Roulette-wheel draw from a probability vector.
///
/// Only positive entries can be drawn. Returns `None` if there is none.
fn sample<R: Rng>(probabilities: &[f64], rng: &mut R) -> Option<usize> {
    let threshold = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    let mut last = None;

    for (j, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last = Some(j);
        if cumulative > threshold {
            return Some(j);
        }
    }

    last // floating-point fallback
}

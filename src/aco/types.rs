//! Core data types for the ACO engine.

use super::pheromone::PheromoneMatrix;
use crate::error::AcoError;

/// A closed tour: a permutation of `0..n`. The last city connects back
/// to the first.
pub type Tour = Vec<usize>;

/// Immutable square matrix of non-negative edge costs.
///
/// The diagonal is never used for routing. The matrix need not be
/// symmetric; the pheromone update treats every edge symmetrically
/// regardless.
///
/// # Examples
///
/// ```
/// use u_aco::aco::CostMatrix;
///
/// let costs = CostMatrix::new(vec![
///     vec![0.0, 10.0, 15.0],
///     vec![10.0, 0.0, 35.0],
///     vec![15.0, 35.0, 0.0],
/// ]).unwrap();
/// assert_eq!(costs.len(), 3);
/// assert_eq!(costs.tour_cost(&[0, 1, 2]), 60.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostMatrix {
    n: usize,
    values: Vec<f64>,
}

impl CostMatrix {
    /// Builds a cost matrix from rows.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidInput`] if the matrix is not square, has fewer
    /// than 2 cities, or contains a negative or non-finite cost.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, AcoError> {
        let n = rows.len();
        if n < 2 {
            return Err(AcoError::invalid_input(format!(
                "cost matrix needs at least 2 cities, got {n}"
            )));
        }

        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(AcoError::invalid_input(format!(
                    "cost matrix is not square: row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, &c) in row.iter().enumerate() {
                if !c.is_finite() || c < 0.0 {
                    return Err(AcoError::invalid_input(format!(
                        "cost ({i}, {j}) must be finite and non-negative, got {c}"
                    )));
                }
            }
            values.extend(row);
        }

        Ok(Self { n, values })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`; a valid matrix has at least 2 cities.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cost of the edge `from -> to`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }

    /// All outgoing costs from `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.values[from * self.n..(from + 1) * self.n]
    }

    /// Cost of the closed tour, including the edge back to the start.
    ///
    /// An empty tour costs `0.0`.
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        let len = tour.len();
        (0..len)
            .map(|i| self.get(tour[i], tour[(i + 1) % len]))
            .sum()
    }
}

/// Best tour found so far within one solve call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incumbent {
    /// The tour.
    pub tour: Tour,
    /// Its closed cost.
    pub cost: f64,
    /// Round (0-based) in which it was found.
    pub round: usize,
}

/// Receives progress notifications from [`AntColony`](super::AntColony).
///
/// Called synchronously once per completed round, after the pheromone
/// update. The loop does not start the next round until `on_round`
/// returns, so a slow observer throttles the optimizer.
///
/// The observer gets an owned copy of the pheromone matrix; it cannot
/// reach the engine's live state.
pub trait RoundObserver {
    /// Called after round `round` (0-based) has been applied.
    ///
    /// `tours` and `costs` are this round's agents in agent order.
    /// `incumbent` is the best tour of the solve so far.
    fn on_round(
        &mut self,
        round: usize,
        pheromone: PheromoneMatrix,
        tours: &[Tour],
        costs: &[f64],
        incumbent: Option<&Incumbent>,
    );
}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn on_round(
        &mut self,
        round: usize,
        pheromone: PheromoneMatrix,
        tours: &[Tour],
        costs: &[f64],
        incumbent: Option<&Incumbent>,
    ) {
        (**self).on_round(round, pheromone, tours, costs, incumbent);
    }
}

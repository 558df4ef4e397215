//! Pheromone model: the learned desirability matrix and its update rule.
//!
//! # Transition rule
//!
//! From city `i`, each unvisited city `j` scores
//!
//! ```text
//! tau(i, j)^alpha * (1 / (cost(i, j) + eps))^beta
//! ```
//!
//! and the scores are normalized into a probability vector.
//!
//! # Update rule
//!
//! Once per round every entry is multiplied by `1 - decay`, then each
//! agent deposits `1 / cost` on both directions of every edge of its
//! closed tour.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents", IEEE Trans. SMC-B 26(1), 29-41.

use super::types::{CostMatrix, Tour};
use crate::error::AcoError;

/// Initial value of every pheromone entry.
pub const INITIAL_PHEROMONE: f64 = 1.0;

/// Added to every cost in the heuristic term so that zero-cost edges do
/// not divide by zero.
pub const COST_EPSILON: f64 = 1e-10;

/// Largest amount a single tour may deposit on one edge. Used for
/// zero-cost tours.
pub const MAX_DEPOSIT: f64 = 1.0 / COST_EPSILON;

/// Square matrix of pheromone levels.
///
/// Row-major; `get(i, j)` is the level on the directed pair `i -> j`.
/// The update rule keeps it symmetric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneMatrix {
    n: usize,
    values: Vec<f64>,
}

impl PheromoneMatrix {
    /// An `n x n` matrix with every entry set to `value`.
    pub fn filled(n: usize, value: f64) -> Self {
        Self {
            n,
            values: vec![value; n * n],
        }
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }

    #[inline]
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.values[from * self.n + to] = value;
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.values[from * self.n..(from + 1) * self.n]
    }

    /// Smallest entry (`+inf` for an empty matrix).
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest entry (`-inf` for an empty matrix).
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn scale(&mut self, factor: f64) {
        for v in &mut self.values {
            *v *= factor;
        }
    }

    fn reinforce(&mut self, from: usize, to: usize, amount: f64) {
        self.values[from * self.n + to] += amount;
        self.values[to * self.n + from] += amount;
    }
}

/// Pheromone matrix plus the exponents that weigh it against the
/// cost heuristic.
#[derive(Debug, Clone)]
pub struct PheromoneModel {
    matrix: PheromoneMatrix,
    alpha: f64,
    beta: f64,
}

impl PheromoneModel {
    /// Creates a model over `n` cities with every entry at
    /// [`INITIAL_PHEROMONE`].
    pub fn new(n: usize, alpha: f64, beta: f64) -> Self {
        Self::from_matrix(PheromoneMatrix::filled(n, INITIAL_PHEROMONE), alpha, beta)
    }

    /// Creates a model from an existing matrix.
    pub fn from_matrix(matrix: PheromoneMatrix, alpha: f64, beta: f64) -> Self {
        Self {
            matrix,
            alpha,
            beta,
        }
    }

    /// Restores every entry to [`INITIAL_PHEROMONE`].
    pub fn reset(&mut self) {
        self.matrix = PheromoneMatrix::filled(self.matrix.len(), INITIAL_PHEROMONE);
    }

    pub fn matrix(&self) -> &PheromoneMatrix {
        &self.matrix
    }

    /// Owned copy of the current matrix.
    pub fn snapshot(&self) -> PheromoneMatrix {
        self.matrix.clone()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Probability of moving from `current` to each city.
    ///
    /// `visited[j]` marks cities already on the tour; they get
    /// probability 0. The result has one entry per city and sums to 1.
    ///
    /// When every unvisited score is exactly zero in total (for example
    /// because the relevant pheromone levels are all zero) the result is
    /// uniform over the unvisited cities. When the total overflows, the
    /// mass is split evenly among the overflowing entries.
    ///
    /// # Errors
    ///
    /// - [`AcoError::InvalidState`] if every city is already visited.
    /// - [`AcoError::InvalidInput`] on mismatched dimensions or an
    ///   out-of-range `current`.
    pub fn transition_probabilities(
        &self,
        costs: &CostMatrix,
        current: usize,
        visited: &[bool],
    ) -> Result<Vec<f64>, AcoError> {
        let n = self.matrix.len();
        if costs.len() != n || visited.len() != n {
            return Err(AcoError::invalid_input(format!(
                "dimension mismatch: pheromone {n}, costs {}, visited {}",
                costs.len(),
                visited.len()
            )));
        }
        if current >= n {
            return Err(AcoError::invalid_input(format!(
                "current city {current} out of range for {n} cities"
            )));
        }

        let unvisited = visited.iter().filter(|&&v| !v).count();
        if unvisited == 0 {
            return Err(AcoError::invalid_state(
                "no unvisited city left to transition to",
            ));
        }

        let mut scores = vec![0.0; n];
        for (j, score) in scores.iter_mut().enumerate() {
            if visited[j] {
                continue;
            }
            let tau = self.matrix.get(current, j).powf(self.alpha);
            // 0 * inf would be NaN; a zero factor scores 0.
            if tau == 0.0 {
                continue;
            }
            let eta = (1.0 / (costs.get(current, j) + COST_EPSILON)).powf(self.beta);
            if eta == 0.0 {
                continue;
            }
            *score = tau * eta;
        }

        let total: f64 = scores.iter().sum();

        if total == 0.0 {
            let p = 1.0 / unvisited as f64;
            for (score, &seen) in scores.iter_mut().zip(visited) {
                *score = if seen { 0.0 } else { p };
            }
        } else if total.is_infinite() {
            let overflowed = scores.iter().filter(|s| s.is_infinite()).count();
            if overflowed > 0 {
                let p = 1.0 / overflowed as f64;
                for score in &mut scores {
                    *score = if score.is_infinite() { p } else { 0.0 };
                }
            } else {
                // Only the sum overflowed; rescale by the largest score first.
                let max = scores.iter().copied().fold(0.0, f64::max);
                let rescaled: f64 = scores.iter().map(|s| s / max).sum();
                for score in &mut scores {
                    *score = *score / max / rescaled;
                }
            }
        } else {
            for score in &mut scores {
                *score /= total;
            }
        }

        Ok(scores)
    }

    /// Applies one round's update: evaporation of the whole matrix, then
    /// a symmetric deposit of [`deposit_amount`]`(cost)` on every edge of
    /// each closed tour.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidInput`] if `tours` and `costs` differ in length
    /// or a tour references a city out of range. The matrix is left
    /// untouched in that case.
    pub fn evaporate_and_deposit(
        &mut self,
        tours: &[Tour],
        costs: &[f64],
        decay: f64,
    ) -> Result<(), AcoError> {
        if tours.len() != costs.len() {
            return Err(AcoError::invalid_input(format!(
                "{} tours but {} costs",
                tours.len(),
                costs.len()
            )));
        }
        let n = self.matrix.len();
        if let Some(&city) = tours.iter().flatten().find(|&&c| c >= n) {
            return Err(AcoError::invalid_input(format!(
                "tour city {city} out of range for {n} cities"
            )));
        }

        self.matrix.scale(1.0 - decay);

        for (tour, &cost) in tours.iter().zip(costs) {
            let amount = deposit_amount(cost);
            if amount == 0.0 {
                continue;
            }
            let len = tour.len();
            for i in 0..len {
                self.matrix.reinforce(tour[i], tour[(i + 1) % len], amount);
            }
        }

        Ok(())
    }
}

/// Pheromone deposited per edge by a tour of the given cost.
///
/// `1 / cost`, capped at [`MAX_DEPOSIT`]. A zero-cost tour deposits the
/// cap.
///
/// A negative or non-finite cost deposits nothing. [`CostMatrix`] only
/// holds finite non-negative costs, so the engine never takes that
/// branch; it guards direct callers of this function and of
/// [`PheromoneModel::evaporate_and_deposit`].
pub fn deposit_amount(cost: f64) -> f64 {
    if !cost.is_finite() || cost < 0.0 {
        0.0
    } else if cost == 0.0 {
        MAX_DEPOSIT
    } else {
        (1.0 / cost).min(MAX_DEPOSIT)
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
    fn test_probabilities_sum_to_one() {
        let model = PheromoneModel::new(4, 1.0, 2.0);
        let probs = model
            .transition_probabilities(&four_city(), 0, &[true, false, false, false])
            .unwrap();

        assert_eq!(probs.len(), 4);
        assert_eq!(probs[0], 0.0);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "sum was {sum}");
    }

    #[test]
    fn test_probabilities_favor_short_edges() {
        // With uniform pheromone, p ~ 1/d^2: d = 10, 15, 20.
        let model = PheromoneModel::new(4, 1.0, 2.0);
        let probs = model
            .transition_probabilities(&four_city(), 0, &[true, false, false, false])
            .unwrap();

        assert!(probs[1] > probs[2] && probs[2] > probs[3]);
        let expected_ratio = (15.0_f64 / 10.0).powi(2);
        assert!((probs[1] / probs[2] - expected_ratio).abs() < 1e-6);
    }

    #[test]
    fn test_probabilities_zero_beta_follows_pheromone() {
        let mut matrix = PheromoneMatrix::filled(3, 1.0);
        matrix.set(0, 1, 3.0);
        let costs = CostMatrix::new(vec![
            vec![0.0, 100.0, 1.0],
            vec![100.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .unwrap();
        let model = PheromoneModel::from_matrix(matrix, 1.0, 0.0);
        let probs = model
            .transition_probabilities(&costs, 0, &[true, false, false])
            .unwrap();

        assert!((probs[1] - 0.75).abs() < 1e-12);
        assert!((probs[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_zero_pheromone_falls_back_to_uniform() {
        let model = PheromoneModel::from_matrix(PheromoneMatrix::filled(4, 0.0), 1.0, 2.0);
        let probs = model
            .transition_probabilities(&four_city(), 1, &[true, true, false, false])
            .unwrap();

        assert_eq!(probs, vec![0.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_zero_pheromone_single_unvisited() {
        let model = PheromoneModel::from_matrix(PheromoneMatrix::filled(4, 0.0), 1.0, 2.0);
        let probs = model
            .transition_probabilities(&four_city(), 0, &[true, true, false, true])
            .unwrap();

        assert_eq!(probs, vec![0.0, 0.0, 1.0, 0.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_zero_cost_edge_is_finite() {
        let costs = CostMatrix::new(vec![
            vec![0.0, 0.0, 5.0],
            vec![0.0, 0.0, 5.0],
            vec![5.0, 5.0, 0.0],
        ])
        .unwrap();
        let model = PheromoneModel::new(3, 1.0, 2.0);
        let probs = model
            .transition_probabilities(&costs, 0, &[true, false, false])
            .unwrap();

        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[1] > 0.99, "zero-cost edge should dominate, got {probs:?}");
    }

    #[test]
    fn test_overflowing_scores_stay_finite() {
        let costs = CostMatrix::new(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        // (1 / 1e-10)^40 overflows to inf.
        let model = PheromoneModel::new(3, 1.0, 40.0);
        let probs = model
            .transition_probabilities(&costs, 0, &[true, false, false])
            .unwrap();

        assert_eq!(probs, vec![0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_overflowing_sum_is_rescaled() {
        let model = PheromoneModel::from_matrix(PheromoneMatrix::filled(4, 1e308), 1.0, 0.0);
        let probs = model
            .transition_probabilities(&four_city(), 0, &[true, false, false, false])
            .unwrap();

        for &p in &probs[1..] {
            assert!((p - 1.0 / 3.0).abs() < 1e-12, "got {probs:?}");
        }
    }

    #[test]
    fn test_all_visited_is_invalid_state() {
        let model = PheromoneModel::new(4, 1.0, 2.0);
        let err = model
            .transition_probabilities(&four_city(), 0, &[true; 4])
            .unwrap_err();
        assert!(matches!(err, AcoError::InvalidState(_)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = PheromoneModel::new(3, 1.0, 2.0);
        let err = model
            .transition_probabilities(&four_city(), 0, &[true, false, false, false])
            .unwrap_err();
        assert!(matches!(err, AcoError::InvalidInput(_)));
    }

    #[test]
    fn test_evaporate_then_deposit() {
        let mut model = PheromoneModel::new(4, 1.0, 2.0);
        model
            .evaporate_and_deposit(&[vec![0, 1, 3, 2]], &[80.0], 0.1)
            .unwrap();

        let m = model.matrix();
        let on_tour = 0.9 + 1.0 / 80.0;
        for (a, b) in [(0, 1), (1, 3), (3, 2), (2, 0)] {
            assert!((m.get(a, b) - on_tour).abs() < 1e-12);
            assert!((m.get(b, a) - on_tour).abs() < 1e-12);
        }
        assert!((m.get(0, 3) - 0.9).abs() < 1e-12);
        assert!((m.get(1, 2) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_deposit_accumulates_over_tours() {
        let mut model = PheromoneModel::new(3, 1.0, 2.0);
        model
            .evaporate_and_deposit(&[vec![0, 1, 2], vec![2, 1, 0]], &[10.0, 20.0], 0.5)
            .unwrap();

        let expected = 0.5 + 0.1 + 0.05;
        assert!((model.matrix().get(0, 1) - expected).abs() < 1e-12);
        assert!((model.matrix().get(1, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_update_keeps_symmetry() {
        let mut model = PheromoneModel::new(5, 1.0, 2.0);
        model
            .evaporate_and_deposit(
                &[vec![0, 2, 4, 1, 3], vec![4, 3, 2, 1, 0]],
                &[12.0, 7.5],
                0.3,
            )
            .unwrap();
        let m = model.matrix();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_zero_cost_deposit_is_capped() {
        let mut model = PheromoneModel::new(2, 1.0, 2.0);
        model
            .evaporate_and_deposit(&[vec![0, 1]], &[0.0], 0.1)
            .unwrap();
        let v = model.matrix().get(0, 1);
        assert!(v.is_finite());
        assert!((v - (0.9 + 2.0 * MAX_DEPOSIT)).abs() / v < 1e-12);
    }

    #[test]
    fn test_deposit_amount() {
        assert_eq!(deposit_amount(4.0), 0.25);
        assert_eq!(deposit_amount(0.0), MAX_DEPOSIT);
        assert_eq!(deposit_amount(1e-300), MAX_DEPOSIT);
        assert_eq!(deposit_amount(f64::INFINITY), 0.0);
        assert_eq!(deposit_amount(f64::NAN), 0.0);
    }

    #[test]
    fn test_non_finite_cost_only_evaporates() {
        let mut model = PheromoneModel::new(3, 1.0, 2.0);
        model
            .evaporate_and_deposit(&[vec![0, 1, 2]], &[f64::INFINITY], 0.5)
            .unwrap();
        assert_eq!(model.matrix(), &PheromoneMatrix::filled(3, 0.5));
    }

    #[test]
    fn test_mismatched_update_leaves_matrix() {
        let mut model = PheromoneModel::new(3, 1.0, 2.0);
        assert!(model
            .evaporate_and_deposit(&[vec![0, 1, 2]], &[], 0.1)
            .is_err());
        assert!(model
            .evaporate_and_deposit(&[vec![0, 1, 7]], &[3.0], 0.1)
            .is_err());
        assert_eq!(model.matrix(), &PheromoneMatrix::filled(3, INITIAL_PHEROMONE));
    }

    #[test]
    fn test_reset() {
        let mut model = PheromoneModel::new(3, 1.0, 2.0);
        model
            .evaporate_and_deposit(&[vec![0, 1, 2]], &[3.0], 0.5)
            .unwrap();
        model.reset();
        assert_eq!(model.matrix().min(), INITIAL_PHEROMONE);
        assert_eq!(model.matrix().max(), INITIAL_PHEROMONE);
    }
}

//! Ant Colony Optimization (ACO) for the symmetric TSP.
//!
//! A population of agents builds tours each round, choosing the next city
//! with probability proportional to a learned pheromone level and the
//! inverse edge cost. After every round the pheromone matrix evaporates
//! and each agent reinforces the edges of its tour in proportion to the
//! tour's quality.
//!
//! # Key Types
//!
//! - [`CostMatrix`]: validated, read-only edge costs
//! - [`PheromoneModel`]: transition probabilities and the update rule
//! - [`TourConstructor`]: one agent's randomized tour construction
//! - [`AntColony`]: the round loop with cancellation and observation
//! - [`RoundObserver`]: per-round progress hook
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod construct;
mod pheromone;
mod runner;
mod types;

pub use config::AcoConfig;
pub use construct::TourConstructor;
pub use pheromone::{
    deposit_amount, PheromoneMatrix, PheromoneModel, COST_EPSILON, INITIAL_PHEROMONE,
    MAX_DEPOSIT,
};
pub use runner::{AcoResult, AntColony, SolveState};
pub use types::{CostMatrix, Incumbent, RoundObserver, Tour};

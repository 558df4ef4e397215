//! Ant Colony Optimization engine for the symmetric Traveling Salesman
//! Problem.
//!
//! Provides:
//!
//! - **ACO engine** ([`aco`]): pheromone model, randomized tour
//!   construction, evaporation/deposit update, and a round loop with
//!   cooperative cancellation and a synchronous per-round observer.
//! - **Input** ([`io`]): cost matrices as whitespace-separated rows and
//!   run parameters as `key=value` lines.
//! - **Sweeps** ([`sweep`]): repeated solves over a parameter grid, and
//!   convergence comparison across configurations.
//!
//! # Architecture
//!
//! Like the rest of the U-Engine algorithm layer, this crate takes its
//! seeded random streams from `u-numflow` and `rand`; errors use
//! `thiserror` and progress is logged through `tracing`, with no
//! subscriber installed by the library. Rendering, plotting and any
//! interactive driver are left to consumers: they observe the engine
//! through [`aco::RoundObserver`] and stop it through a cancellation
//! predicate.
//!
//! # Example
//!
//! ```
//! use u_aco::aco::{AcoConfig, AntColony};
//! use u_aco::io::parse_cost_matrix;
//!
//! let costs = parse_cost_matrix("0 10 15 20\n10 0 35 25\n15 35 0 30\n20 25 30 0").unwrap();
//! let config = AcoConfig::default().with_iterations(50).with_seed(7);
//!
//! let result = AntColony::new(&costs, config).unwrap().solve().unwrap();
//! assert_eq!(result.best_cost, 80.0);
//! ```

pub mod aco;
pub mod error;
pub mod io;
pub mod sweep;

pub use error::AcoError;

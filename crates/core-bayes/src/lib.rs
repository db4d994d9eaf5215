//! Bayesian-style search over `FillingConfig`'s tunable dimensions (spec
//! component I): proposes parameter vectors, evaluates them through
//! `core-quantify`, and keeps the best one seen.

mod dimensions;
mod driver;
mod optimiser;
mod random_search;

pub use dimensions::{bounds_of, guess_grid, selected_dimensions, Dimension, DimensionKind};
pub use driver::{run, BayesianOutcome};
pub use optimiser::{OptimiserError, SequentialOptimiser};
pub use random_search::RandomSearchOptimiser;

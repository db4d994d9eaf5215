//! Disagreement scalar and percentile aggregation over seeds (spec
//! component H): the objective the Bayesian driver minimises.

mod aggregate;
mod error;
mod metrics;

pub use aggregate::{evaluate_seeds, percentile_result, top_seeds, SeedResult};
pub use error::QuantifyError;
pub use metrics::{compute, QuantifiedConfig};

//! The path-generation engine (spec component G): seed selection, forward/
//! backward propagation with repulsion and discontinuity handling, coverage
//! bookkeeping, and the `FilledPattern` driver that ties them together.

mod coverage;
mod disk_cache;
mod dual_line;
mod equidistant;
mod error;
mod filled_pattern;
mod propagate;
mod repulsion;
mod seed_queue;
mod terminability;

pub use coverage::Coverage;
pub use disk_cache::DiskCache;
pub use dual_line::trace_dual_line;
pub use equidistant::extract_equidistant_seeds;
pub use error::EngineError;
pub use filled_pattern::FilledPattern;
pub use repulsion::compute_repulsion;
pub use seed_queue::SeedPipeline;
pub use terminability::is_terminable;

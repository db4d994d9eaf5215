//! Seed-line extraction (spec component D): perimeter lines and zero-splay
//! lines, the two independent producers `core-pattern` chains together when
//! building a `DesiredPattern`.

mod chain;
mod perimeter;
mod seed_line;
mod splay_lines;
mod tracer;

pub use chain::chain_into_lines;
pub use perimeter::extract_perimeter_lines;
pub use seed_line::SeedLine;
pub use splay_lines::extract_splay_lines;
pub use tracer::trace_curve;

//! `DesiredPattern`, the read-only shape/director/splay/seed-line container
//! every engine run is built against (spec component E).

mod bucket;
mod desired_pattern;
mod error;
mod trim;

pub use desired_pattern::DesiredPattern;
pub use error::PatternError;

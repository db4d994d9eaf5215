//! The `Path` record (spec component F): centreline, offset edges, overlap
//! profile, and originating seed point.

mod path;

pub use path::{Path, SeedPoint};

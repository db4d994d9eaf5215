//! Path sorting (spec component J): ordering a `FilledPattern`'s paths for
//! output. Two strategies, selected by `SortingMethod` — nearest-neighbour
//! and seed-line-aware — both implemented as a pure reordering over owned
//! `Path` values: the centreline/edge/overlap storage is never mutated,
//! only each path's `reversed` flag and its position in the output order.

mod nearest_neighbour;
mod seed_line_aware;

use core_config::{FillingFlags, SortingMethod};
use core_path::Path;

pub use nearest_neighbour::nearest_neighbour_sort;
pub use seed_line_aware::seed_line_aware_sort;

/// Dispatches on `flags.sorting_method` (§4.J, §9 "Polymorphism over
/// sorting strategy" — a closed variant, no open extension point).
pub fn sort_paths(paths: Vec<Path>, flags: &FillingFlags, seed_spacing: f64) -> Vec<Path> {
    match flags.sorting_method {
        SortingMethod::NearestNeighbour => nearest_neighbour_sort(paths, flags.vector_sorting),
        SortingMethod::SeedLineAware => seed_line_aware_sort(paths, seed_spacing),
    }
}

use core_geometry::FloatCoord;
use core_path::Path;

/// Repeatedly picks the unprocessed path closest to the previous emission's
/// end point (§4.J "Nearest-neighbour"). The very first pick has no
/// previous end to compare against; the origin stands in for a nozzle
/// starting at its home position, so the first path chosen is simply the
/// one nearest `(0, 0)`.
///
/// When `vector_sorting` is on, only a path's start is ever considered —
/// reversing it would reverse the travel direction the director committed
/// to, so orientation is fixed. When it's off, both the start and the end
/// are candidates; whichever is closer wins and marks the path reversed.
pub fn nearest_neighbour_sort(paths: Vec<Path>, vector_sorting: bool) -> Vec<Path> {
    let mut remaining = paths;
    let mut output = Vec::with_capacity(remaining.len());
    let mut prev_end = FloatCoord::ZERO;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        let mut best_reversed = false;

        for (i, path) in remaining.iter().enumerate() {
            let start_dist = (path.first_raw() - prev_end).norm();
            if start_dist < best_dist {
                best_dist = start_dist;
                best_idx = i;
                best_reversed = false;
            }
            if !vector_sorting {
                let end_dist = (path.last_raw() - prev_end).norm();
                if end_dist < best_dist {
                    best_dist = end_dist;
                    best_idx = i;
                    best_reversed = true;
                }
            }
        }

        let mut next = remaining.remove(best_idx);
        next.set_reversed(best_reversed);
        prev_end = if best_reversed { next.first_raw() } else { next.last_raw() };
        output.push(next);
    }

    output
}

use core_field::DirectorField;
use core_geometry::Coord;
use core_seedlines::SeedLine;

use crate::coverage::Coverage;

/// The anisotropic step distance between two line points (§4.G "Equidistant
/// seed extraction"): the larger of each endpoint's projection of `Δ` onto
/// its own perpendicular-unit director, and twice their harmonic mean —
/// the harmonic mean smooths the estimate where the two endpoints disagree
/// sharply (e.g. either one near-degenerate).
fn anisotropic_distance(p: Coord, q: Coord, field: &DirectorField) -> f64 {
    let delta = (q - p).as_float();
    let d_p = field.at(p.x, p.y).perpendicular().normalised();
    let d_q = field.at(q.x, q.y).perpendicular().normalised();
    let dist_p = d_p.dot(delta).abs();
    let dist_q = d_q.dot(delta).abs();
    let harmonic = if dist_p + dist_q > 0.0 {
        2.0 * dist_p * dist_q / (dist_p + dist_q)
    } else {
        0.0
    };
    dist_p.max(dist_q).max(2.0 * harmonic)
}

/// Walks `points` forward from `start` (wrapping if `closed`), emitting a
/// seed each time the anisotropic distance from the previous emission meets
/// `spacing`, or `spacing / 2` immediately after passing through an
/// already-filled cell.
fn walk_forward(
    points: &[Coord],
    closed: bool,
    start: usize,
    spacing: f64,
    field: &DirectorField,
    coverage: &Coverage,
) -> Vec<Coord> {
    let n = points.len();
    let mut seeds = vec![points[start]];
    let mut last = points[start];
    let mut threshold = spacing;
    let mut i = start;

    loop {
        i = if closed { (i + 1) % n } else { i + 1 };
        if closed && i == start {
            break;
        }
        if !closed && i >= n {
            break;
        }
        let current = points[i];
        if anisotropic_distance(last, current, field) >= threshold {
            seeds.push(current);
            last = current;
            threshold = if coverage.is_filled(current) { spacing / 2.0 } else { spacing };
        }
    }
    seeds
}

/// Extracts equidistant seed points from `line`, starting at `start_index`
/// (§4.G). Closed lines wrap around in a single pass; open lines walk
/// forward then backward from the start, reversing the backward half so the
/// whole sequence runs in increasing-index order.
pub fn extract_equidistant_seeds(
    line: &SeedLine,
    start_index: usize,
    spacing: f64,
    field: &DirectorField,
    coverage: &Coverage,
) -> Vec<Coord> {
    if line.is_empty() {
        return Vec::new();
    }
    let start_index = start_index.min(line.len() - 1);

    if line.closed {
        return walk_forward(&line.points, true, start_index, spacing, field, coverage);
    }

    let forward = walk_forward(&line.points, false, start_index, spacing, field, coverage);

    let mut reversed_points = line.points.clone();
    reversed_points.reverse();
    let backward_start = line.points.len() - 1 - start_index;
    let mut backward = walk_forward(&reversed_points, false, backward_start, spacing, field, coverage);
    backward.reverse();
    backward.pop();

    backward.extend(forward);
    backward
}

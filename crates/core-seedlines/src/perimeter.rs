use std::collections::HashSet;

use core_geometry::{disk_offsets, Coord, FloatCoord};
use core_field::SplayField;

use crate::chain::chain_into_lines;
use crate::seed_line::SeedLine;

const SEPARATION_THRESHOLD: f64 = 2.0;
const MIN_LINE_LENGTH: usize = 20;
const NORMAL_DISK_RADIUS: f64 = 4.0;

fn is_on_geometric_edge(p: Coord, width: usize, height: usize, shape: &[bool]) -> bool {
    const NEIGHBOURS: [(i32, i32); 8] = [
        (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1),
    ];
    NEIGHBOURS.iter().any(|&(dx, dy)| {
        let n = Coord::new(p.x + dx, p.y + dy);
        !n.in_bounds(width, height) || !shape[n.y as usize * width + n.x as usize]
    })
}

/// The mean displacement from `p` to every out-of-shape neighbour within
/// `NORMAL_DISK_RADIUS`, i.e. the discretised outward normal used by the
/// valid-perimeter-point test (§4.D).
fn outward_normal(p: Coord, width: usize, height: usize, shape: &[bool]) -> FloatCoord {
    let mut sum = FloatCoord::ZERO;
    let mut count = 0;
    for offset in disk_offsets(NORMAL_DISK_RADIUS) {
        if offset == Coord::ZERO {
            continue;
        }
        let n = p + offset;
        let outside = !n.in_bounds(width, height)
            || !shape[n.y as usize * width + n.x as usize];
        if outside {
            sum = sum + offset.as_float();
            count += 1;
        }
    }
    if count == 0 {
        FloatCoord::ZERO
    } else {
        sum * (1.0 / count as f64)
    }
}

fn is_valid_perimeter_point(
    p: Coord,
    width: usize,
    height: usize,
    shape: &[bool],
    splay: &SplayField,
) -> bool {
    if !is_on_geometric_edge(p, width, height, shape) {
        return false;
    }
    let normal = outward_normal(p, width, height, shape);
    normal.dot(splay.at(p.x, p.y)) >= 0.0
}

/// Extracts the perimeter seed lines (§4.D). Falls back to pure geometric
/// edge points (condition 1 only, re-chained) when no line from the full
/// valid-point test survives the minimum-length filter.
pub fn extract_perimeter_lines(
    width: usize,
    height: usize,
    shape: &[bool],
    splay: &SplayField,
) -> Vec<SeedLine> {
    let mut candidates: HashSet<Coord> = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            if !shape[y * width + x] {
                continue;
            }
            let p = Coord::new(x as i32, y as i32);
            if is_valid_perimeter_point(p, width, height, shape, splay) {
                candidates.insert(p);
            }
        }
    }

    let lines = chain_into_lines(&candidates, SEPARATION_THRESHOLD, MIN_LINE_LENGTH);
    if !lines.is_empty() {
        return lines;
    }

    tracing::debug!("no perimeter lines survived the splay test, falling back to geometric edge");
    let mut edge_only: HashSet<Coord> = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            if !shape[y * width + x] {
                continue;
            }
            let p = Coord::new(x as i32, y as i32);
            if is_on_geometric_edge(p, width, height, shape) {
                edge_only.insert(p);
            }
        }
    }
    chain_into_lines(&edge_only, SEPARATION_THRESHOLD, MIN_LINE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_field::{compute_splay, DirectorField};

    fn square_shape(width: usize, height: usize, margin: usize) -> Vec<bool> {
        let mut shape = vec![false; width * height];
        for y in margin..height - margin {
            for x in margin..width - margin {
                shape[y * width + x] = true;
            }
        }
        shape
    }

    #[test]
    fn uniform_director_square_yields_a_perimeter_line() {
        let width = 30;
        let height = 30;
        let shape = square_shape(width, height, 5);
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        let splay = compute_splay(&field);
        let lines = extract_perimeter_lines(width, height, &shape, &splay);
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.len() >= MIN_LINE_LENGTH));
    }

    #[test]
    fn falls_back_to_geometric_edge_when_no_candidates_pass() {
        // An all-false splay never satisfies the dot-product test except at
        // exactly zero, so extraction still falls back cleanly to the
        // geometric-only edge set.
        let width = 30;
        let height = 30;
        let shape = square_shape(width, height, 5);
        let dx = vec![0.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        let splay = compute_splay(&field);
        let lines = extract_perimeter_lines(width, height, &shape, &splay);
        assert!(!lines.is_empty());
    }
}

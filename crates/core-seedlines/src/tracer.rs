use std::collections::HashSet;

use core_geometry::{Coord, FloatCoord};

const MAX_TRACE_STEPS: usize = 100_000;

fn in_shape(p: Coord, width: usize, height: usize, shape: &[bool]) -> bool {
    p.in_bounds(width, height) && shape[p.y as usize * width + p.x as usize]
}

/// Steps a vector field (supplied via `direction_at`) from `start` in one
/// direction (`sign` is `+1.0` forward, `-1.0` backward) until the field
/// vanishes, the curve leaves the shape, or it re-enters a cell already
/// visited on this trace (§4.D, also used for the engine's "dual line").
/// Returns the ordered integer cells visited, excluding `start` itself.
pub fn trace_half(
    start: Coord,
    sign: f64,
    direction_at: impl Fn(FloatCoord) -> FloatCoord,
    width: usize,
    height: usize,
    shape: &[bool],
    trace_visited: &mut HashSet<Coord>,
) -> Vec<Coord> {
    let mut out = Vec::new();
    let mut position = start.as_float();

    for _ in 0..MAX_TRACE_STEPS {
        let direction = direction_at(position);
        if direction.norm() < 0.5 {
            break;
        }
        let step = direction.normalised() * sign;
        position = position + step;
        let next = position.to_coord_rounded();
        if !in_shape(next, width, height, shape) {
            break;
        }
        if trace_visited.contains(&next) {
            break;
        }
        trace_visited.insert(next);
        out.push(next);
    }
    out
}

/// Traces both directions from `start` and joins them into a single ordered
/// curve (backward half reversed, then `start`, then forward half).
pub fn trace_curve(
    start: Coord,
    direction_at: impl Fn(FloatCoord) -> FloatCoord,
    width: usize,
    height: usize,
    shape: &[bool],
) -> Vec<Coord> {
    let mut trace_visited: HashSet<Coord> = HashSet::new();
    trace_visited.insert(start);
    let mut backward = trace_half(start, -1.0, &direction_at, width, height, shape, &mut trace_visited);
    let forward = trace_half(start, 1.0, &direction_at, width, height, shape, &mut trace_visited);
    backward.reverse();

    let mut curve = backward;
    curve.push(start);
    curve.extend(forward);
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_curve_stops_at_the_shape_edge() {
        let width = 20;
        let height = 20;
        let shape = vec![true; width * height];
        let curve = trace_curve(
            Coord::new(10, 10),
            |_| FloatCoord::new(1.0, 0.0),
            width,
            height,
            &shape,
        );
        assert!(curve.iter().all(|c| c.in_bounds(width, height)));
        assert!(curve.len() > 1);
    }
}

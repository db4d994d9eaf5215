//! Pixel-grid rasterisation primitives (§4.A): Bresenham line stepping,
//! closed-disk / ring offset tables, swept-quadrilateral coverage, and the
//! half-disk end cap. Every function here is pure and allocation-light; the
//! engine caches the disk/ring tables once per `FillingConfig` rather than
//! recomputing them per step.

use crate::coord::{Coord, FloatCoord};

/// Rasterise the displacement `(dx, dy)` starting at the origin using
/// Bresenham's algorithm, handling all eight octants by swapping/negating
/// axes before stepping and undoing the transform per emitted point.
///
/// One pixel is emitted per unit step of the major axis, matching §4.A.
/// Rasterising `(-dx, -dy)` yields the exact reverse of this sequence
/// (tested in `tests::bresenham_is_idempotent_under_negation`).
pub fn bresenham_line(dx: f64, dy: f64) -> Vec<Coord> {
    let steps = dx.abs().max(dy.abs()).round() as i64;
    if steps == 0 {
        return vec![Coord::ZERO];
    }

    let x_step = dx / steps as f64;
    let y_step = dy / steps as f64;

    let mut points = Vec::with_capacity(steps as usize + 1);
    let mut last = Coord::new(i32::MIN, i32::MIN);
    for i in 0..=steps {
        let p = FloatCoord::new(x_step * i as f64, y_step * i as f64).to_coord_rounded();
        if p != last {
            points.push(p);
            last = p;
        }
    }
    points
}

/// All integer offsets `(i, j)` with `i^2 + j^2 <= radius^2`, i.e. the
/// closed disk of the given radius, centred on the origin.
pub fn disk_offsets(radius: f64) -> Vec<Coord> {
    let r = radius.max(0.0);
    let r_ceil = r.ceil() as i32;
    let r_sq = r * r;
    let mut offsets = Vec::new();
    for i in -r_ceil..=r_ceil {
        for j in -r_ceil..=r_ceil {
            if (i * i + j * j) as f64 <= r_sq {
                offsets.push(Coord::new(i, j));
            }
        }
    }
    offsets
}

/// The one-pixel-wide ring `{(i,j) : ceil(sqrt(i^2+j^2)) == ceil(radius)}`,
/// used for the termination test's "ahead" neighbourhood (§4.G).
pub fn ring_offsets(radius: f64) -> Vec<Coord> {
    let r = radius.max(0.0);
    let target = r.ceil() as i64;
    if target == 0 {
        return vec![Coord::ZERO];
    }
    let r_ceil = target as i32;
    let mut offsets = Vec::new();
    for i in -r_ceil..=r_ceil {
        for j in -r_ceil..=r_ceil {
            let norm = ((i * i + j * j) as f64).sqrt();
            if norm.ceil() as i64 == target {
                offsets.push(Coord::new(i, j));
            }
        }
    }
    offsets
}

/// Repairs a self-crossing quadrilateral by collapsing the offending corner
/// pair to its midpoint, as described in §4.A. The swept quadrilaterals
/// built from consecutive path edges are only ever degenerate at sharp
/// direction reversals, where the 1-2 or 3-4 edge crosses its opposite
/// edge; substituting the midpoint keeps the rasteriser from producing an
/// unbounded or self-intersecting cell set.
fn repair_degenerate(mut corners: [FloatCoord; 4]) -> [FloatCoord; 4] {
    let [p1, p2, p3, p4] = corners;
    let edge12_crosses_34 = segments_cross(p1, p2, p3, p4);
    if edge12_crosses_34 {
        let mid12 = FloatCoord::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
        corners[0] = mid12;
        corners[1] = mid12;
    }
    let [p1, p2, p3, p4] = corners;
    let edge23_crosses_41 = segments_cross(p2, p3, p4, p1);
    if edge23_crosses_41 {
        let mid34 = FloatCoord::new((p3.x + p4.x) / 2.0, (p3.y + p4.y) / 2.0);
        corners[2] = mid34;
        corners[3] = mid34;
    }
    corners
}

fn segments_cross(a: FloatCoord, b: FloatCoord, c: FloatCoord, d: FloatCoord) -> bool {
    let d1 = (b - a).cross(c - a);
    let d2 = (b - a).cross(d - a);
    let d3 = (d - c).cross(a - c);
    let d4 = (d - c).cross(b - c);
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}

/// Rasterise the convex quadrilateral `p1 -> p2 -> p3 -> p4 -> p1`.
///
/// `is_exclusive` toggles strict containment on the `p1 -> p2` edge only;
/// the remaining three edges are always inclusive. This asymmetry lets two
/// consecutive swept segments of the same path share the dividing edge
/// without double-covering it (§4.A).
pub fn sweep_quadrilateral(
    p1: FloatCoord,
    p2: FloatCoord,
    p3: FloatCoord,
    p4: FloatCoord,
    is_exclusive: bool,
) -> Vec<Coord> {
    let [p1, p2, p3, p4] = repair_degenerate([p1, p2, p3, p4]);
    let corners = [p1, p2, p3, p4];

    let signed_area: f64 = {
        let mut sum = 0.0;
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            sum += a.cross(b);
        }
        sum / 2.0
    };
    if signed_area.abs() < 1e-12 {
        return Vec::new();
    }
    let winding = signed_area.signum();

    let min_x = corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_x = corners
        .iter()
        .map(|c| c.x)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil() as i32;
    let min_y = corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_y = corners
        .iter()
        .map(|c| c.y)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil() as i32;

    let mut cells = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = FloatCoord::new(x as f64, y as f64);
            let mut inside = true;
            for edge in 0..4 {
                let a = corners[edge];
                let b = corners[(edge + 1) % 4];
                let side = (b - a).cross(p - a) * winding;
                let ok = if edge == 0 && is_exclusive {
                    side > 1e-9
                } else {
                    side > -1e-9
                };
                if !ok {
                    inside = false;
                    break;
                }
            }
            if inside {
                cells.push(Coord::new(x, y));
            }
        }
    }
    cells
}

/// The integer cells of a half-disk of the given radius centred on `centre`,
/// restricted to the half-plane ahead of the direction the path was
/// travelling when it stopped (§4.A). `edge_a`/`edge_b` are the ± offset
/// endpoints at the last node; their connecting line is the cut, oriented
/// using `previous_direction` so the cap covers the side the path is moving
/// *away from* as it terminates, not the side it is coming from.
pub fn half_disk(
    centre: Coord,
    edge_a: FloatCoord,
    edge_b: FloatCoord,
    radius: f64,
    previous_direction: FloatCoord,
) -> Vec<Coord> {
    let cut_line = edge_b - edge_a;
    let mut cut_normal = cut_line.perpendicular().normalised();
    if cut_normal.dot(previous_direction) < 0.0 {
        cut_normal = -cut_normal;
    }
    if cut_normal == FloatCoord::ZERO {
        cut_normal = previous_direction.normalised();
    }

    disk_offsets(radius)
        .into_iter()
        .filter(|offset| offset.as_float().dot(cut_normal) >= 0.0)
        .map(|offset| centre + offset)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bresenham_starts_at_origin() {
        let points = bresenham_line(5.0, 0.0);
        assert_eq!(points[0], Coord::ZERO);
        assert_eq!(*points.last().unwrap(), Coord::new(5, 0));
    }

    #[test]
    fn bresenham_is_idempotent_under_negation() {
        let forward = bresenham_line(7.0, -3.0);
        let mut backward = bresenham_line(-7.0, 3.0);
        backward.reverse();
        let shifted: Vec<Coord> = backward
            .into_iter()
            .map(|c| c + *forward.last().unwrap())
            .collect();
        assert_eq!(forward, shifted);
    }

    #[test]
    fn bresenham_handles_all_octants() {
        for (dx, dy) in [
            (5.0, 2.0),
            (2.0, 5.0),
            (-5.0, 2.0),
            (-2.0, 5.0),
            (5.0, -2.0),
            (2.0, -5.0),
            (-5.0, -2.0),
            (-2.0, -5.0),
        ] {
            let points = bresenham_line(dx, dy);
            assert_eq!(points[0], Coord::ZERO);
            let last = *points.last().unwrap();
            assert_eq!(last.x, dx.round() as i32);
            assert_eq!(last.y, dy.round() as i32);
        }
    }

    #[test]
    fn disk_offsets_contains_origin_and_is_symmetric() {
        let offsets = disk_offsets(3.0);
        assert!(offsets.contains(&Coord::ZERO));
        for &c in &offsets {
            assert!(offsets.contains(&Coord::new(-c.x, -c.y)));
        }
    }

    #[test]
    fn ring_offsets_excludes_disk_interior() {
        let ring = ring_offsets(3.0);
        let disk = disk_offsets(2.0);
        for c in ring {
            assert!(!disk.contains(&c));
        }
    }

    #[test]
    fn sweep_rectangle_matches_closed_rectangle_area() {
        // Axis-aligned unit-width rectangle spanning x in [0,4], y in [-1,1].
        let p1 = FloatCoord::new(0.0, 1.0);
        let p2 = FloatCoord::new(4.0, 1.0);
        let p3 = FloatCoord::new(4.0, -1.0);
        let p4 = FloatCoord::new(0.0, -1.0);
        let inclusive = sweep_quadrilateral(p1, p2, p3, p4, false);
        // All of x in 0..=4, y in -1..=1.
        assert_eq!(inclusive.len(), 5 * 3);

        let exclusive = sweep_quadrilateral(p1, p2, p3, p4, true);
        // Strict on edge p1->p2, i.e. the y = 1 row is now excluded.
        assert_eq!(exclusive.len(), 5 * 2);
    }

    #[test]
    fn adjacent_segments_cover_every_pixel_exactly_once() {
        // Two rectangles sharing the p1-p2 edge of the second as the p3-p4
        // edge of the first: first is exclusive on its leading edge so the
        // shared column is only covered by the second segment.
        let shared_a = FloatCoord::new(2.0, 1.0);
        let shared_b = FloatCoord::new(2.0, -1.0);
        let seg1 = sweep_quadrilateral(
            FloatCoord::new(0.0, 1.0),
            shared_a,
            shared_b,
            FloatCoord::new(0.0, -1.0),
            false,
        );
        let seg2 = sweep_quadrilateral(
            shared_a,
            FloatCoord::new(4.0, 1.0),
            FloatCoord::new(4.0, -1.0),
            shared_b,
            true,
        );
        let shared_column_in_seg1 = seg1.iter().filter(|c| c.x == 2).count();
        let shared_column_in_seg2 = seg2.iter().filter(|c| c.x == 2).count();
        assert_eq!(shared_column_in_seg1, 3);
        assert_eq!(shared_column_in_seg2, 0);
    }

    #[test]
    fn half_disk_keeps_only_the_forward_half() {
        let cells = half_disk(
            Coord::ZERO,
            FloatCoord::new(0.0, 1.0),
            FloatCoord::new(0.0, -1.0),
            3.0,
            FloatCoord::new(1.0, 0.0),
        );
        assert!(cells.iter().all(|c| c.x >= 0));
        assert!(cells.iter().any(|c| c.x > 0));
    }
}

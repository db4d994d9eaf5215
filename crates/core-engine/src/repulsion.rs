use core_geometry::FloatCoord;
use core_pattern::DesiredPattern;

use crate::coverage::Coverage;

/// Computes the repulsion vector for a proposed step direction `t` and
/// candidate centre position `p` (§4.G "Repulsion"): samples integer
/// displacements along the perpendicular of `t` spanning `±(print_radius -
/// 1)`, averages the offsets of those that land in-shape-but-unfilled, and
/// scales by `repulsion_magnitude`. Small raw vectors are accepted outright
/// if they stay within the angle budget; larger ones are walked back by
/// integer steps until the angle budget is met.
pub fn compute_repulsion(
    t: FloatCoord,
    p: FloatCoord,
    pattern: &DesiredPattern,
    coverage: &Coverage,
    print_radius: f64,
    repulsion_magnitude: f64,
    repulsion_angle: f64,
) -> FloatCoord {
    if repulsion_magnitude <= 0.0 {
        return FloatCoord::ZERO;
    }
    let perp = t.perpendicular().normalised();
    if perp == FloatCoord::ZERO {
        return FloatCoord::ZERO;
    }

    let half_width = (print_radius - 1.0).max(0.0).round() as i32;
    let mut offsets = Vec::new();
    for i in -half_width..=half_width {
        let offset = perp * i as f64;
        let candidate = (p + offset).to_coord_rounded();
        if pattern.is_in_shape(candidate) && !coverage.is_filled(candidate) {
            offsets.push(offset);
        }
    }
    if offsets.is_empty() {
        return FloatCoord::ZERO;
    }

    let mean = offsets.iter().fold(FloatCoord::ZERO, |acc, &o| acc + o) * (1.0 / offsets.len() as f64);
    let r_max = mean * repulsion_magnitude;
    if r_max == FloatCoord::ZERO {
        return FloatCoord::ZERO;
    }

    let t_unit = t.normalised();
    let cos_budget = repulsion_angle.cos();

    if r_max.norm() < 1.0 {
        let deviated = (t + r_max).normalised();
        if t_unit.dot(deviated) >= cos_budget {
            r_max
        } else {
            FloatCoord::ZERO
        }
    } else {
        let k_max = r_max.norm().ceil() as i32;
        for k in (1..=k_max).rev() {
            let candidate = r_max * (k as f64 / k_max as f64);
            let deviated = (t + candidate).normalised();
            if candidate.dot(r_max) > 0.0 && t_unit.dot(deviated) >= cos_budget {
                return candidate;
            }
        }
        FloatCoord::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::SplayLineBoundaryPolicy;
    use core_field::DirectorField;

    fn pattern(width: usize, height: usize) -> DesiredPattern {
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 1).unwrap()
    }

    #[test]
    fn zero_magnitude_yields_no_repulsion() {
        let desired = pattern(40, 40);
        let coverage = Coverage::new(desired.width(), desired.height());
        let r = compute_repulsion(
            FloatCoord::new(1.0, 0.0),
            FloatCoord::new(20.0, 20.0),
            &desired,
            &coverage,
            4.0,
            0.0,
            0.5,
        );
        assert_eq!(r, FloatCoord::ZERO);
    }

    #[test]
    fn symmetric_unfilled_neighbourhood_yields_near_zero_repulsion() {
        let desired = pattern(40, 40);
        let coverage = Coverage::new(desired.width(), desired.height());
        let r = compute_repulsion(
            FloatCoord::new(1.0, 0.0),
            FloatCoord::new(20.0, 20.0),
            &desired,
            &coverage,
            4.0,
            0.5,
            std::f64::consts::FRAC_PI_2,
        );
        assert!(r.norm() < 1e-9);
    }
}

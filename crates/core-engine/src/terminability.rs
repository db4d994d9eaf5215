use core_geometry::{Coord, FloatCoord};
use core_pattern::DesiredPattern;

use crate::coverage::Coverage;

/// A position is terminable if it is out of shape, already filled, or any
/// cell within the termination ring is filled and lies ahead of `p` along
/// `tangent` (§4.G "Terminability"). A zero termination radius collapses the
/// ring to just the origin, so only the cell itself is checked.
pub fn is_terminable(p: Coord, tangent: FloatCoord, pattern: &DesiredPattern, coverage: &Coverage, termination_ring: &[Coord]) -> bool {
    if !pattern.is_in_shape(p) {
        return true;
    }
    if coverage.is_filled(p) {
        return true;
    }
    termination_ring.iter().any(|&offset| {
        let ahead = offset.as_float().dot(tangent) > 0.0;
        ahead && coverage.is_filled(p + offset)
    })
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
    fn out_of_shape_is_always_terminable() {
        let desired = pattern(20, 20);
        let coverage = Coverage::new(desired.width(), desired.height());
        assert!(is_terminable(Coord::new(-1, -1), FloatCoord::new(1.0, 0.0), &desired, &coverage, &[Coord::ZERO]));
    }

    #[test]
    fn already_filled_cell_is_terminable() {
        let desired = pattern(20, 20);
        let mut coverage = Coverage::new(desired.width(), desired.height());
        let p = Coord::new(10, 10);
        coverage.commit_cell(p, FloatCoord::new(1.0, 0.0));
        assert!(is_terminable(p, FloatCoord::new(1.0, 0.0), &desired, &coverage, &[Coord::ZERO]));
    }

    #[test]
    fn unfilled_open_cell_is_not_terminable() {
        let desired = pattern(20, 20);
        let coverage = Coverage::new(desired.width(), desired.height());
        let p = Coord::new(10, 10);
        assert!(!is_terminable(p, FloatCoord::new(1.0, 0.0), &desired, &coverage, &[Coord::ZERO]));
    }
}

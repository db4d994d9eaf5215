use core_field::DirectorField;
use core_geometry::Coord;
use core_pattern::DesiredPattern;
use core_seedlines::{trace_curve, SeedLine};

/// Traces the dual line through `root` (§4.G "reseeding"): the integral
/// curve of the field perpendicular to the director, in both directions,
/// until exit or self-encounter.
pub fn trace_dual_line(root: Coord, field: &DirectorField, pattern: &DesiredPattern) -> SeedLine {
    let curve = trace_curve(
        root,
        |p| field.interpolate(p).perpendicular(),
        pattern.width(),
        pattern.height(),
        pattern.shape(),
    );
    let closed = curve.len() > 2 && (curve[0] - *curve.last().unwrap()).norm() <= 2.0;
    SeedLine::new(curve, closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::SplayLineBoundaryPolicy;

    #[test]
    fn dual_line_through_uniform_field_runs_perpendicular_to_the_director() {
        let width = 40;
        let height = 40;
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        let pattern = DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 1).unwrap();
        let line = trace_dual_line(Coord::new(20, 20), pattern.director(), &pattern);
        assert!(!line.is_empty());
        assert!(line.points.iter().all(|p| p.x == 20));
    }
}

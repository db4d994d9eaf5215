use core_geometry::{Coord, FloatCoord};

/// The three coverage matrices (§3 "Coverage matrices"): `fills` is a
/// saturating per-cell count, `(fx, fy)` accumulates a signed director
/// contribution aligned with each cell's first fill.
#[derive(Debug, Clone)]
pub struct Coverage {
    width: usize,
    height: usize,
    fills: Vec<u8>,
    fx: Vec<f64>,
    fy: Vec<f64>,
}

impl Coverage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            fills: vec![0; width * height],
            fx: vec![0.0; width * height],
            fy: vec![0.0; width * height],
        }
    }

    fn index(&self, p: Coord) -> Option<usize> {
        p.grid_index(self.width, self.height)
    }

    pub fn fills_at(&self, p: Coord) -> u8 {
        self.index(p).map(|i| self.fills[i]).unwrap_or(0)
    }

    pub fn is_filled(&self, p: Coord) -> bool {
        self.fills_at(p) > 0
    }

    pub fn director_at(&self, p: Coord) -> FloatCoord {
        match self.index(p) {
            Some(i) => FloatCoord::new(self.fx[i], self.fy[i]),
            None => FloatCoord::ZERO,
        }
    }

    /// Increments `fills` by one and accumulates `director` into `(Fx, Fy)`,
    /// flipping its sign first if that keeps continuity with whatever is
    /// already stored (§4.G "Coverage bookkeeping"). Returns the signed
    /// contribution actually applied, so callers can later undo this exact
    /// commit during point-removal/min-line-length rewind.
    pub fn commit_cell(&mut self, p: Coord, director: FloatCoord) -> Option<FloatCoord> {
        let idx = self.index(p)?;
        let stored = FloatCoord::new(self.fx[idx], self.fy[idx]);
        let contribution = if stored.dot(director) < 0.0 { -director } else { director };
        self.fills[idx] = self.fills[idx].saturating_add(1);
        self.fx[idx] += contribution.x;
        self.fy[idx] += contribution.y;
        Some(contribution)
    }

    /// Exactly undoes a prior `commit_cell` given the contribution it
    /// returned (§4.G "Post-processing" rewind).
    pub fn rewind_cell(&mut self, p: Coord, contribution: FloatCoord) {
        if let Some(idx) = self.index(p) {
            self.fills[idx] = self.fills[idx].saturating_sub(1);
            self.fx[idx] -= contribution.x;
            self.fy[idx] -= contribution.y;
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fills(&self) -> &[u8] {
        &self.fills
    }

    pub fn fx(&self) -> &[f64] {
        &self.fx
    }

    pub fn fy(&self) -> &[f64] {
        &self.fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_then_rewind_returns_to_zero() {
        let mut coverage = Coverage::new(10, 10);
        let p = Coord::new(3, 3);
        let d = FloatCoord::new(1.0, 0.0);
        let applied = coverage.commit_cell(p, d).unwrap();
        assert_eq!(coverage.fills_at(p), 1);
        coverage.rewind_cell(p, applied);
        assert_eq!(coverage.fills_at(p), 0);
        assert_eq!(coverage.director_at(p), FloatCoord::ZERO);
    }

    #[test]
    fn second_commit_flips_sign_for_continuity() {
        let mut coverage = Coverage::new(10, 10);
        let p = Coord::new(3, 3);
        coverage.commit_cell(p, FloatCoord::new(1.0, 0.0)).unwrap();
        let applied = coverage.commit_cell(p, FloatCoord::new(-1.0, 0.0)).unwrap();
        // Opposing director should flip to preserve the existing accumulation.
        assert_eq!(applied, FloatCoord::new(1.0, 0.0));
        assert_eq!(coverage.fills_at(p), 2);
        assert_eq!(coverage.director_at(p), FloatCoord::new(2.0, 0.0));
    }

    #[test]
    fn out_of_bounds_commit_is_a_no_op() {
        let mut coverage = Coverage::new(4, 4);
        assert!(coverage.commit_cell(Coord::new(-1, 0), FloatCoord::new(1.0, 0.0)).is_none());
    }
}

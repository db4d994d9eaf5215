use core_geometry::FloatCoord;
use tracing::debug;

use crate::director::DirectorField;

/// The vector splay field `S = Q . div(Q)` derived from a director field,
/// where `Q = D (x) D` (§4.B). Cells outside the shape have an undefined
/// value here (the tensor is still computed from whatever lies in `D`) but
/// callers must never query them — `core-pattern` enforces that by masking
/// queries against the shape.
#[derive(Debug, Clone)]
pub struct SplayField {
    width: usize,
    height: usize,
    sx: Vec<f64>,
    sy: Vec<f64>,
}

impl SplayField {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn at(&self, x: i32, y: i32) -> FloatCoord {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return FloatCoord::ZERO;
        }
        let idx = y as usize * self.width + x as usize;
        FloatCoord::new(self.sx[idx], self.sy[idx])
    }

    pub fn magnitude_at(&self, x: i32, y: i32) -> f64 {
        self.at(x, y).norm()
    }

    /// Wraps an already-computed field (e.g. read from `splay.csv`), as an
    /// alternative to `compute`.
    pub fn from_raw(width: usize, height: usize, sx: Vec<f64>, sy: Vec<f64>) -> Self {
        assert_eq!(sx.len(), width * height);
        assert_eq!(sy.len(), width * height);
        Self { width, height, sx, sy }
    }
}

/// Nine-point-stencil derivative: four axis-aligned neighbours weighted 1,
/// four diagonal neighbours weighted 0.5 in the appropriate axis (§4.B).
/// Indices are clamped to the grid so the stencil degrades gracefully one
/// cell in from the border; genuine border cells are overwritten afterwards
/// by `compute` with their nearest interior neighbour's value.
fn d_dx(field: &[f64], width: usize, height: usize, x: usize, y: usize) -> f64 {
    let get = |xx: i64, yy: i64| -> f64 {
        let xx = xx.clamp(0, width as i64 - 1) as usize;
        let yy = yy.clamp(0, height as i64 - 1) as usize;
        field[yy * width + xx]
    };
    let x = x as i64;
    let y = y as i64;
    let axis = get(x + 1, y) - get(x - 1, y);
    let diag_up = get(x + 1, y + 1) - get(x - 1, y + 1);
    let diag_down = get(x + 1, y - 1) - get(x - 1, y - 1);
    (axis + 0.5 * diag_up + 0.5 * diag_down) / 4.0
}

fn d_dy(field: &[f64], width: usize, height: usize, x: usize, y: usize) -> f64 {
    let get = |xx: i64, yy: i64| -> f64 {
        let xx = xx.clamp(0, width as i64 - 1) as usize;
        let yy = yy.clamp(0, height as i64 - 1) as usize;
        field[yy * width + xx]
    };
    let x = x as i64;
    let y = y as i64;
    let axis = get(x, y + 1) - get(x, y - 1);
    let diag_right = get(x + 1, y + 1) - get(x + 1, y - 1);
    let diag_left = get(x - 1, y + 1) - get(x - 1, y - 1);
    (axis + 0.5 * diag_right + 0.5 * diag_left) / 4.0
}

/// Computes the splay vector field from a director field (§4.B): builds
/// `Q = D (x) D`, differentiates it with the 9-point stencil to get
/// `div(Q)`, then contracts `Q . div(Q)`. Interior cells are computed
/// directly; the outermost ring inherits its nearest interior neighbour's
/// value rather than being computed from a stencil that would reach off
/// the grid.
pub fn compute(field: &DirectorField) -> SplayField {
    let (width, height) = (field.width(), field.height());
    debug!(width, height, "computing splay field");

    let mut qxx = vec![0.0; width * height];
    let mut qxy = vec![0.0; width * height];
    let mut qyy = vec![0.0; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = field.at(x as i32, y as i32);
            let idx = y * width + x;
            qxx[idx] = d.x * d.x;
            qxy[idx] = d.x * d.y;
            qyy[idx] = d.y * d.y;
        }
    }

    let mut sx = vec![0.0; width * height];
    let mut sy = vec![0.0; width * height];

    let interior = |x: usize, y: usize, w: usize, h: usize| x > 0 && y > 0 && x + 1 < w && y + 1 < h;

    for y in 0..height {
        for x in 0..width {
            if !interior(x, y, width, height) {
                continue;
            }
            let div_x = d_dx(&qxx, width, height, x, y) + d_dy(&qxy, width, height, x, y);
            let div_y = d_dx(&qxy, width, height, x, y) + d_dy(&qyy, width, height, x, y);
            let idx = y * width + x;
            sx[idx] = qxx[idx] * div_x + qxy[idx] * div_y;
            sy[idx] = qxy[idx] * div_x + qyy[idx] * div_y;
        }
    }

    if width > 2 && height > 2 {
        for x in 0..width {
            let src_top = 1 * width + x.clamp(1, width - 2);
            let src_bottom = (height - 2) * width + x.clamp(1, width - 2);
            sx[x] = sx[src_top];
            sy[x] = sy[src_top];
            sx[(height - 1) * width + x] = sx[src_bottom];
            sy[(height - 1) * width + x] = sy[src_bottom];
        }
        for y in 0..height {
            let src_left = y.clamp(1, height - 2) * width + 1;
            let src_right = y.clamp(1, height - 2) * width + (width - 2);
            sx[y * width] = sx[src_left];
            sy[y * width] = sy[src_left];
            sx[y * width + width - 1] = sx[src_right];
            sy[y * width + width - 1] = sy[src_right];
        }
    }

    SplayField { width, height, sx, sy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_director_has_zero_splay() {
        let width = 12;
        let height = 12;
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        let splay = compute(&field);
        for y in 2..height - 2 {
            for x in 2..width - 2 {
                assert!(splay.magnitude_at(x as i32, y as i32) < 1e-9);
            }
        }
    }

    #[test]
    fn border_inherits_nearest_interior_value() {
        let width = 10;
        let height = 10;
        let mut dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        // Introduce a radial-ish perturbation so splay is nonzero somewhere.
        for y in 0..height {
            for x in 0..width {
                dx[y * width + x] = (x as f64 - 5.0).signum().max(0.1);
            }
        }
        let field = DirectorField::new(width, height, dx, dy);
        let splay = compute(&field);
        let top = splay.at(5, 0);
        let inherited_from = splay.at(5, 1);
        assert_eq!(top.x, inherited_from.x);
        assert_eq!(top.y, inherited_from.y);
    }
}

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// An integer pixel coordinate on the director-field grid.
///
/// Arithmetic is elementwise; there is no implicit clamping to any grid
/// extent here — callers (e.g. `core-pattern`) are responsible for bounds
/// checks against a specific `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Coord) -> i64 {
        self.x as i64 * other.x as i64 + self.y as i64 * other.y as i64
    }

    pub fn cross(self, other: Coord) -> i64 {
        self.x as i64 * other.y as i64 - self.y as i64 * other.x as i64
    }

    pub fn norm(self) -> f64 {
        ((self.x as i64 * self.x as i64 + self.y as i64 * self.y as i64) as f64).sqrt()
    }

    pub fn norm_squared(self) -> i64 {
        self.x as i64 * self.x as i64 + self.y as i64 * self.y as i64
    }

    pub fn as_float(self) -> FloatCoord {
        FloatCoord::new(self.x as f64, self.y as f64)
    }

    /// Index into a `width x height` row-major grid, or `None` if out of bounds.
    pub fn grid_index(self, width: usize, height: usize) -> Option<usize> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let (x, y) = (self.x as usize, self.y as usize);
        if x >= width || y >= height {
            return None;
        }
        Some(y * width + x)
    }

    pub fn in_bounds(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;
    fn mul(self, rhs: i32) -> Coord {
        Coord::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Coord {
    type Output = Coord;
    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

/// The floating-point twin of `Coord`, used for subpixel positions (path
/// nodes, offset edges, splay vectors, director samples).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatCoord {
    pub x: f64,
    pub y: f64,
}

impl FloatCoord {
    pub const ZERO: FloatCoord = FloatCoord { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: FloatCoord) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: FloatCoord) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `FloatCoord::ZERO` if `self` is
    /// (numerically) the zero vector.
    pub fn normalised(self) -> FloatCoord {
        let n = self.norm();
        if n < 1e-12 {
            FloatCoord::ZERO
        } else {
            self * (1.0 / n)
        }
    }

    /// Perpendicular (rotate +90 degrees), used throughout the engine to go
    /// from a director/tangent to the offset-edge direction.
    pub fn perpendicular(self) -> FloatCoord {
        FloatCoord::new(-self.y, self.x)
    }

    /// Explicit truncating cast to the integer grid, as required by §3: the
    /// source never rounds here, it truncates towards zero.
    pub fn to_coord_truncated(self) -> Coord {
        Coord::new(self.x as i32, self.y as i32)
    }

    /// Rounds to the nearest integer coordinate (used for rasterisation
    /// endpoints where the source rounds rather than truncates).
    pub fn to_coord_rounded(self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl Add for FloatCoord {
    type Output = FloatCoord;
    fn add(self, rhs: FloatCoord) -> FloatCoord {
        FloatCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for FloatCoord {
    type Output = FloatCoord;
    fn sub(self, rhs: FloatCoord) -> FloatCoord {
        FloatCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for FloatCoord {
    type Output = FloatCoord;
    fn mul(self, rhs: f64) -> FloatCoord {
        FloatCoord::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for FloatCoord {
    type Output = FloatCoord;
    fn neg(self) -> FloatCoord {
        FloatCoord::new(-self.x, -self.y)
    }
}

impl From<Coord> for FloatCoord {
    fn from(c: Coord) -> Self {
        c.as_float()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_cross_match_definitions() {
        let a = Coord::new(3, 4);
        let b = Coord::new(-1, 2);
        assert_eq!(a.dot(b), -3 + 8);
        assert_eq!(a.cross(b), 3 * 2 - 4 * (-1));
    }

    #[test]
    fn norm_of_3_4_is_5() {
        assert_eq!(Coord::new(3, 4).norm(), 5.0);
    }

    #[test]
    fn perpendicular_is_a_quarter_turn() {
        let t = FloatCoord::new(1.0, 0.0);
        let p = t.perpendicular();
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn truncation_rounds_toward_zero_not_down() {
        let c = FloatCoord::new(-1.9, 1.9);
        let t = c.to_coord_truncated();
        assert_eq!(t, Coord::new(-1, 1));
    }

    #[test]
    fn grid_index_rejects_negative_and_oob() {
        assert_eq!(Coord::new(-1, 0).grid_index(10, 10), None);
        assert_eq!(Coord::new(10, 0).grid_index(10, 10), None);
        assert_eq!(Coord::new(9, 9).grid_index(10, 10), Some(99));
    }
}

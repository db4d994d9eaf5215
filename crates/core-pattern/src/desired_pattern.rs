use core_config::SplayLineBoundaryPolicy;
use core_field::{compute_splay, DirectorField, SplayField};
use core_geometry::Coord;
use core_seedlines::{extract_perimeter_lines, extract_splay_lines, SeedLine};

use crate::bucket::bucket_by_splay;
use crate::error::PatternError;
use crate::trim::trim;

/// Read-only holder for everything a `FilledPattern` needs about the shape
/// being filled (§4.E, spec component E). Built once, then shared by
/// immutable reference with every `FilledPattern`/`QuantifiedConfig`
/// evaluated against it.
#[derive(Debug)]
pub struct DesiredPattern {
    width: usize,
    height: usize,
    shape: Vec<bool>,
    director: DirectorField,
    splay: SplayField,
    perimeter_lines: Vec<SeedLine>,
    splay_lines: Vec<SeedLine>,
    reseed_buckets: Vec<Vec<Coord>>,
    is_updated: bool,
}

impl DesiredPattern {
    /// Builds a `DesiredPattern` from a raw shape mask and director field
    /// (§4.E): trims null rows/columns with 10px padding, computes splay,
    /// extracts both seed-line families, and bins interior cells for the
    /// reseeding fallback.
    pub fn build(
        width: usize,
        height: usize,
        shape: Vec<bool>,
        director: DirectorField,
        precomputed_splay: Option<SplayField>,
        splay_line_policy: SplayLineBoundaryPolicy,
        rng_seed: u64,
    ) -> Result<Self, PatternError> {
        if director.width() != width || director.height() != height {
            return Err(PatternError::DimensionMismatch {
                shape_w: width,
                shape_h: height,
                director_w: director.width(),
                director_h: director.height(),
            });
        }

        let (width, height, shape, director) = trim(width, height, &shape, &director)?;

        let splay = match precomputed_splay {
            Some(s) if s.width() == width && s.height() == height => s,
            _ => compute_splay(&director),
        };

        let perimeter_lines = extract_perimeter_lines(width, height, &shape, &splay);
        let splay_lines = extract_splay_lines(
            width,
            height,
            &shape,
            &director,
            &splay,
            splay_line_policy,
            rng_seed,
        );
        let reseed_buckets = bucket_by_splay(width, height, &shape, &splay);

        Ok(Self {
            width,
            height,
            shape,
            director,
            splay,
            perimeter_lines,
            splay_lines,
            reseed_buckets,
            is_updated: true,
        })
    }

    fn assert_updated(&self) {
        assert!(
            self.is_updated,
            "DesiredPattern consumed before construction completed"
        );
    }

    pub fn width(&self) -> usize {
        self.assert_updated();
        self.width
    }

    pub fn height(&self) -> usize {
        self.assert_updated();
        self.height
    }

    pub fn is_in_shape(&self, p: Coord) -> bool {
        self.assert_updated();
        p.in_bounds(self.width, self.height) && self.shape[p.y as usize * self.width + p.x as usize]
    }

    pub fn shape(&self) -> &[bool] {
        self.assert_updated();
        &self.shape
    }

    pub fn director(&self) -> &DirectorField {
        self.assert_updated();
        &self.director
    }

    pub fn splay(&self) -> &SplayField {
        self.assert_updated();
        &self.splay
    }

    pub fn perimeter_lines(&self) -> &[SeedLine] {
        self.assert_updated();
        &self.perimeter_lines
    }

    pub fn splay_lines(&self) -> &[SeedLine] {
        self.assert_updated();
        &self.splay_lines
    }

    /// Buckets of interior cells ordered highest-splay-bucket-first, for the
    /// reseeding fallback (§4.E step 4).
    pub fn reseed_buckets(&self) -> &[Vec<Coord>] {
        self.assert_updated();
        &self.reseed_buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_shape_and_field(width: usize, height: usize) -> (Vec<bool>, DirectorField) {
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        (shape, DirectorField::new(width, height, dx, dy))
    }

    #[test]
    fn build_trims_and_populates_all_accessors() {
        let width = 40;
        let height = 40;
        let (shape, field) = uniform_shape_and_field(width, height);
        let pattern = DesiredPattern::build(
            width,
            height,
            shape,
            field,
            None,
            SplayLineBoundaryPolicy::Centres,
            7,
        )
        .unwrap();
        assert!(pattern.width() <= width);
        assert!(!pattern.reseed_buckets().is_empty());
    }

    #[test]
    fn rejects_mismatched_director_dimensions() {
        let (shape, _) = uniform_shape_and_field(10, 10);
        let mismatched_field = DirectorField::new(5, 5, vec![1.0; 25], vec![0.0; 25]);
        let err = DesiredPattern::build(
            10,
            10,
            shape,
            mismatched_field,
            None,
            SplayLineBoundaryPolicy::Centres,
            1,
        );
        assert!(err.is_err());
    }
}

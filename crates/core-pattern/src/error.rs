use thiserror::Error;

/// Fatal, per-pattern failures surfaced while building a `DesiredPattern`
/// (§7 "Input-format failure"). Callers abort the offending pattern and
/// continue with the next one.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("director field dimensions {director_w}x{director_h} do not match shape {shape_w}x{shape_h}")]
    DimensionMismatch {
        shape_w: usize,
        shape_h: usize,
        director_w: usize,
        director_h: usize,
    },
    #[error("shape mask is empty after trimming null rows/columns")]
    EmptyShape,
}

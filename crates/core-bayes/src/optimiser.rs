use thiserror::Error;

/// Surfaced when the pluggable optimiser can't produce a further proposal
/// (§7 "Optimiser internal failure"). The message matches what the opaque
/// optimiser the source delegates to reports; the driver treats it as an
/// early termination and keeps the best point observed so far.
#[derive(Debug, Error)]
pub enum OptimiserError {
    #[error("nlopt failure")]
    Failure,
}

/// An abstract sequential optimiser of a real-valued function over a
/// bounded box (§9 "Dynamic dispatch for optimiser"): `initialise` sets the
/// box, `propose` asks for the next point to try, `observe` reports its
/// value, `best` returns the best point/value seen. The driver never
/// depends on how `propose` picks its next point.
pub trait SequentialOptimiser {
    fn initialise(&mut self, bounds: &[(f64, f64)]);
    fn propose(&mut self) -> Result<Vec<f64>, OptimiserError>;
    fn observe(&mut self, point: &[f64], value: f64);
    fn best(&self) -> Option<(Vec<f64>, f64)>;
}

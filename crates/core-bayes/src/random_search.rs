use rand::Rng;
use rand_mt::Mt19937GenRand64;

use crate::optimiser::{OptimiserError, SequentialOptimiser};

/// The concrete `SequentialOptimiser` plugged in by this workspace: explores
/// uniformly at random within the box, and every `relearning_period`-th
/// proposal exploits by perturbing the best point observed so far instead
/// (§4.I "the optimiser's internal search kernel" is out of scope; this is
/// one valid implementation of the trait, not the only one).
pub struct RandomSearchOptimiser {
    bounds: Vec<(f64, f64)>,
    observations: Vec<(Vec<f64>, f64)>,
    relearning_period: usize,
    rng: Mt19937GenRand64,
}

impl RandomSearchOptimiser {
    pub fn new(seed: u64, relearning_period: usize) -> Self {
        Self {
            bounds: Vec::new(),
            observations: Vec::new(),
            relearning_period: relearning_period.max(1),
            rng: Mt19937GenRand64::new(seed),
        }
    }

    fn random_point(&mut self) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|&(lo, hi)| lo + self.rng.gen::<f64>() * (hi - lo))
            .collect()
    }

    fn perturb(&mut self, point: &[f64]) -> Vec<f64> {
        self.bounds
            .iter()
            .zip(point)
            .map(|(&(lo, hi), &v)| {
                let span = (hi - lo).max(1e-9);
                let jitter = (self.rng.gen::<f64>() - 0.5) * 0.2 * span;
                (v + jitter).clamp(lo, hi)
            })
            .collect()
    }
}

impl SequentialOptimiser for RandomSearchOptimiser {
    fn initialise(&mut self, bounds: &[(f64, f64)]) {
        self.bounds = bounds.to_vec();
        self.observations.clear();
    }

    fn propose(&mut self) -> Result<Vec<f64>, OptimiserError> {
        if self.bounds.is_empty() {
            return Err(OptimiserError::Failure);
        }
        let should_exploit = !self.observations.is_empty() && self.observations.len() % self.relearning_period == 0;
        if should_exploit {
            let best_point = self.best().map(|(p, _)| p).unwrap();
            Ok(self.perturb(&best_point))
        } else {
            Ok(self.random_point())
        }
    }

    fn observe(&mut self, point: &[f64], value: f64) {
        self.observations.push((point.to_vec(), value));
    }

    fn best(&self) -> Option<(Vec<f64>, f64)> {
        self.observations
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propose_without_bounds_fails_like_an_empty_search_space() {
        let mut optimiser = RandomSearchOptimiser::new(1, 5);
        assert!(optimiser.propose().is_err());
    }

    #[test]
    fn best_tracks_the_lowest_observed_value() {
        let mut optimiser = RandomSearchOptimiser::new(1, 5);
        optimiser.initialise(&[(0.0, 1.0)]);
        optimiser.observe(&[0.2], 0.5);
        optimiser.observe(&[0.8], 0.1);
        optimiser.observe(&[0.4], 0.3);
        let (point, value) = optimiser.best().unwrap();
        assert_eq!(value, 0.1);
        assert_eq!(point, vec![0.8]);
    }
}

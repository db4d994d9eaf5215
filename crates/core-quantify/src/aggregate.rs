use core_config::{DisagreementWeights, FillingConfig, FillingFlags};
use core_engine::FilledPattern;
use core_pattern::DesiredPattern;
use rayon::prelude::*;

use crate::error::QuantifyError;
use crate::metrics::{self, QuantifiedConfig};

/// A single seed's evaluation: the seed used to generate it (FilledPattern
/// regeneration is deterministic given `seed`, §8 "Determinism", so this is
/// enough to reconstruct the full fill on demand without keeping every
/// `FilledPattern` around) plus its metrics.
#[derive(Debug, Clone, Copy)]
pub struct SeedResult {
    pub seed: u64,
    pub metrics: QuantifiedConfig,
}

/// Evaluates `config_template` at each of `seeds`, independently and in
/// parallel (§5 "coarse-grained data-parallel threads"): one `FilledPattern`
/// per seed, each with its own `Coverage` and RNG.
pub fn evaluate_seeds(
    pattern: &DesiredPattern,
    config_template: &FillingConfig,
    flags: &FillingFlags,
    weights: &DisagreementWeights,
    seeds: &[u64],
) -> Result<Vec<SeedResult>, QuantifyError> {
    config_template.validate()?;

    seeds
        .par_iter()
        .map(|&seed| {
            let config = config_template.with_seed(seed);
            // seed never changes validity (validated once above for the template).
            let filled = FilledPattern::generate(pattern, &config, flags)?;
            let metrics = metrics::compute(pattern, &filled, weights);
            Ok(SeedResult { seed, metrics })
        })
        .collect()
}

/// Sorts by disagreement ascending and returns the entry at index
/// `floor(K * (1 - percentile))` (§4.H "Aggregation"). Percentile 1.0 (best)
/// returns index 0; percentile 0.0 (worst) returns the last index.
pub fn percentile_result(results: &[SeedResult], percentile: f64) -> &SeedResult {
    let mut order: Vec<&SeedResult> = results.iter().collect();
    order.sort_by(|a, b| a.metrics.disagreement.partial_cmp(&b.metrics.disagreement).unwrap());
    let k = order.len();
    let index = ((k as f64) * (1.0 - percentile)).floor() as usize;
    order[index.min(k - 1)]
}

/// Returns the `count` seeds with the lowest disagreement, ascending
/// (§4.I "retain the top `layer_count`").
pub fn top_seeds(results: &[SeedResult], count: usize) -> Vec<SeedResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| a.metrics.disagreement.partial_cmp(&b.metrics.disagreement).unwrap());
    sorted.truncate(count);
    sorted
}

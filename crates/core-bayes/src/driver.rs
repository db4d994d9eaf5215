use core_config::{AggregationParameters, BayesianParameters, DisagreementWeights, FillingConfig, FillingFlags};
use core_pattern::DesiredPattern;
use core_quantify::{evaluate_seeds, percentile_result, top_seeds, QuantifiedConfig, QuantifyError, SeedResult};

use crate::dimensions::{apply_point, bounds_of, guess_grid, selected_dimensions, Dimension};
use crate::optimiser::SequentialOptimiser;
use crate::random_search::RandomSearchOptimiser;

/// What the Bayesian search settled on: the winning `FillingConfig`, its
/// aggregated metrics, and the top `layer_count` per-seed results re-run
/// over `final_seeds` (§4.I, last sentence).
#[derive(Debug, Clone)]
pub struct BayesianOutcome {
    pub winning_config: FillingConfig,
    pub winning_metrics: QuantifiedConfig,
    pub final_results: Vec<SeedResult>,
}

/// Deterministic per-evaluation seed batch: `eval_index` disambiguates
/// successive evaluations of the same `FillingConfig` template so distinct
/// points in the search never reuse a seed batch (§5 "RNGs are per-worker
/// and seeded by the seed integer").
fn seed_batch(template: &FillingConfig, eval_index: u64, count: usize) -> Vec<u64> {
    let base = template.seed.wrapping_add(eval_index.wrapping_mul(10_000));
    (0..count as u64).map(|i| base.wrapping_add(i)).collect()
}

fn record_if_better(config: FillingConfig, value: f64, best_config: &mut FillingConfig, best_value: &mut f64) -> bool {
    if value < *best_value {
        *best_value = value;
        *best_config = config;
        true
    } else {
        false
    }
}

fn evaluate_point(
    pattern: &DesiredPattern,
    dimensions: &[Dimension],
    template: &FillingConfig,
    flags: &FillingFlags,
    weights: &DisagreementWeights,
    aggregation: &AggregationParameters,
    point: &[f64],
    eval_index: u64,
) -> Result<(FillingConfig, f64), QuantifyError> {
    let config = apply_point(template, dimensions, point);
    let seeds = seed_batch(template, eval_index, aggregation.seeds_per_evaluation);
    let results = evaluate_seeds(pattern, &config, flags, weights, &seeds)?;
    let picked = percentile_result(&results, aggregation.percentile);
    Ok((config, picked.metrics.disagreement))
}

/// Runs the full §4.I protocol: initial samples, the fixed-guess cartesian
/// product, then sequential-optimiser-driven iteration until `total_iter` is
/// exceeded, `improvement_iter` steps pass without strict improvement, or a
/// disagreement of exactly `0` is observed. An `OptimiserFailure` from
/// `propose` (§7) ends the iteration phase early rather than failing the
/// whole run; the best point already observed is kept. Finishes by
/// re-evaluating the winning point over `final_seeds` seeds and keeping the
/// top `layer_count`.
pub fn run(
    pattern: &DesiredPattern,
    template: &FillingConfig,
    flags: &FillingFlags,
    weights: &DisagreementWeights,
    bayesian: &BayesianParameters,
    aggregation: &AggregationParameters,
) -> Result<BayesianOutcome, QuantifyError> {
    let dimensions = selected_dimensions(&bayesian.optimised_dimensions, template.print_radius);
    let bounds = bounds_of(&dimensions);

    let mut best_config = *template;
    let mut best_value = f64::INFINITY;
    let mut eval_index: u64 = 0;

    if !dimensions.is_empty() {
        let mut optimiser = RandomSearchOptimiser::new(template.seed, bayesian.relearning_period);
        optimiser.initialise(&bounds);

        let initial_sample_count = dimensions.len() * 2;
        for _ in 0..initial_sample_count {
            let Ok(point) = optimiser.propose() else { break };
            let (config, value) = evaluate_point(pattern, &dimensions, template, flags, weights, aggregation, &point, eval_index)?;
            eval_index += 1;
            optimiser.observe(&point, value);
            record_if_better(config, value, &mut best_config, &mut best_value);
        }

        for point in guess_grid(&dimensions) {
            let (config, value) = evaluate_point(pattern, &dimensions, template, flags, weights, aggregation, &point, eval_index)?;
            eval_index += 1;
            optimiser.observe(&point, value);
            record_if_better(config, value, &mut best_config, &mut best_value);
        }

        let mut no_improvement_steps = 0usize;
        let mut total_steps = 0usize;
        while total_steps < bayesian.total_iterations && no_improvement_steps < bayesian.improvement_iterations {
            let point = match optimiser.propose() {
                Ok(point) => point,
                Err(error) => {
                    tracing::warn!(%error, "optimiser ended the search early");
                    break;
                }
            };
            let (config, value) = evaluate_point(pattern, &dimensions, template, flags, weights, aggregation, &point, eval_index)?;
            eval_index += 1;
            optimiser.observe(&point, value);
            total_steps += 1;

            if record_if_better(config, value, &mut best_config, &mut best_value) {
                no_improvement_steps = 0;
            } else {
                no_improvement_steps += 1;
            }

            if best_value == 0.0 {
                tracing::info!("zero disagreement observed, stopping search");
                break;
            }
        }
    }

    let final_seeds: Vec<u64> = (0..aggregation.final_seeds as u64).map(|i| template.seed.wrapping_add(i)).collect();
    let final_all = evaluate_seeds(pattern, &best_config, flags, weights, &final_seeds)?;
    let final_results = top_seeds(&final_all, aggregation.layer_count.max(1));
    let winning_metrics = percentile_result(&final_all, aggregation.percentile).metrics;

    Ok(BayesianOutcome {
        winning_config: best_config,
        winning_metrics,
        final_results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::{FillingMethod, OptimisedDimensions, SplayLineBoundaryPolicy};
    use core_field::DirectorField;

    fn pattern(width: usize, height: usize) -> DesiredPattern {
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 0).unwrap()
    }

    #[test]
    fn runs_a_short_search_and_returns_an_improved_config() {
        let desired = pattern(80, 80);
        let template = FillingConfig::new(FillingMethod::Perimeter, 0.0, 8.0, 4.0, 8.0, 0.0, 0.0, 0).unwrap();
        let flags = FillingFlags::default();
        let weights = DisagreementWeights::default();
        let bayesian = BayesianParameters {
            total_iterations: 4,
            improvement_iterations: 4,
            relearning_period: 2,
            noise: 1e-3,
            optimised_dimensions: OptimisedDimensions {
                repulsion_angle: false,
                repulsion_magnitude: true,
                seed_spacing: false,
                termination_radius: false,
            },
        };
        let aggregation = AggregationParameters {
            worker_threads: 1,
            seeds_per_evaluation: 2,
            final_seeds: 3,
            percentile: 0.5,
            layer_count: 1,
        };
        let outcome = run(&desired, &template, &flags, &weights, &bayesian, &aggregation).unwrap();
        assert_eq!(outcome.final_results.len(), 1);
    }

    #[test]
    fn seed_spacing_search_never_proposes_a_point_validate_rejects() {
        let desired = pattern(80, 80);
        let template = FillingConfig::new(FillingMethod::Perimeter, 0.0, 8.0, 4.0, 8.0, 0.0, 0.0, 0).unwrap();
        let flags = FillingFlags::default();
        let weights = DisagreementWeights::default();
        let bayesian = BayesianParameters {
            total_iterations: 4,
            improvement_iterations: 4,
            relearning_period: 2,
            noise: 1e-3,
            optimised_dimensions: OptimisedDimensions {
                repulsion_angle: false,
                repulsion_magnitude: false,
                seed_spacing: true,
                termination_radius: false,
            },
        };
        let aggregation = AggregationParameters {
            worker_threads: 1,
            seeds_per_evaluation: 2,
            final_seeds: 2,
            percentile: 0.5,
            layer_count: 1,
        };
        let outcome = run(&desired, &template, &flags, &weights, &bayesian, &aggregation).unwrap();
        assert!(outcome.winning_config.seed_spacing >= 2.0 * outcome.winning_config.print_radius);
    }

    #[test]
    fn no_optimised_dimensions_still_produces_final_results() {
        let desired = pattern(60, 60);
        let template = FillingConfig::new(FillingMethod::Perimeter, 0.0, 8.0, 4.0, 8.0, 0.0, 0.0, 0).unwrap();
        let flags = FillingFlags::default();
        let weights = DisagreementWeights::default();
        let bayesian = BayesianParameters {
            total_iterations: 5,
            improvement_iterations: 5,
            relearning_period: 2,
            noise: 1e-3,
            optimised_dimensions: OptimisedDimensions {
                repulsion_angle: false,
                repulsion_magnitude: false,
                seed_spacing: false,
                termination_radius: false,
            },
        };
        let aggregation = AggregationParameters {
            worker_threads: 1,
            seeds_per_evaluation: 2,
            final_seeds: 2,
            percentile: 0.5,
            layer_count: 1,
        };
        let outcome = run(&desired, &template, &flags, &weights, &bayesian, &aggregation).unwrap();
        assert_eq!(outcome.winning_config.seed_spacing, template.seed_spacing);
    }
}

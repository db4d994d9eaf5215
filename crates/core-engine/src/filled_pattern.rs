use core_config::{FillingConfig, FillingFlags};
use core_geometry::{disk_offsets, half_disk, Coord, FloatCoord};
use core_pattern::DesiredPattern;
use core_path::Path;
use rand_mt::Mt19937GenRand64;

use crate::coverage::Coverage;
use crate::disk_cache::DiskCache;
use crate::error::EngineError;
use crate::propagate::propagate_half;
use crate::seed_queue::SeedPipeline;

/// A line's physical length is the sum of its consecutive node distances,
/// not its point count — two paths with the same length but different
/// `step_length` would otherwise be pruned inconsistently (§4.G
/// "Post-processing").
fn path_length(path: &Path) -> f64 {
    let nodes = path.raw_nodes();
    nodes.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Marks the two end half-disks of a committed path as filled (§4.G step 3):
/// each cap is cut along the end's offset edges and oriented away from the
/// direction the path was travelling as it reached that end, so the cap
/// covers the side the nozzle still has to lift off from, not the side it
/// arrived from. Committed cells are pushed into `commits` alongside the
/// rest of the path's coverage so a later min-line-length drop can rewind
/// them too.
fn commit_end_caps(path: &Path, print_radius: f64, coverage: &mut Coverage, commits: &mut Vec<(Coord, FloatCoord)>) {
    let nodes = path.raw_nodes();
    let pos_edge = path.raw_positive_edge();
    let neg_edge = path.raw_negative_edge();
    if nodes.len() < 2 {
        return;
    }
    let last = nodes.len() - 1;

    let start_dir = (nodes[0] - nodes[1]).normalised();
    let start_centre = nodes[0].to_coord_rounded();
    for cell in half_disk(start_centre, pos_edge[0], neg_edge[0], print_radius, start_dir) {
        if let Some(contribution) = coverage.commit_cell(cell, start_dir) {
            commits.push((cell, contribution));
        }
    }

    let end_dir = (nodes[last] - nodes[last - 1]).normalised();
    let end_centre = nodes[last].to_coord_rounded();
    for cell in half_disk(end_centre, pos_edge[last], neg_edge[last], print_radius, end_dir) {
        if let Some(contribution) = coverage.commit_cell(cell, end_dir) {
            commits.push((cell, contribution));
        }
    }
}

/// The generated fill for a single `DesiredPattern`/`FillingConfig` pair
/// (§3 `FilledPattern`, §4.G): every path, plus the coverage matrices they
/// left behind.
#[derive(Debug)]
pub struct FilledPattern {
    paths: Vec<Path>,
    coverage: Coverage,
}

impl FilledPattern {
    /// Runs the full path-generation loop to completion: repeatedly draws a
    /// seed point from the `SeedPipeline`, propagates a path backward and
    /// forward from it, joins the halves, and commits its coverage, until
    /// the pipeline returns the invalid sentinel. Finishes with the two
    /// post-processing passes from §4.G: isolated single-node paths are
    /// dropped, and paths shorter than the minimum line length are dropped
    /// with their coverage contribution rewound exactly.
    pub fn generate(
        pattern: &DesiredPattern,
        config: &FillingConfig,
        flags: &FillingFlags,
    ) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        let mut coverage = Coverage::new(pattern.width(), pattern.height());
        let disk_cache = DiskCache::new(config.print_radius, config.termination_radius);
        let mut pipeline = SeedPipeline::setup(pattern, config.seeding_method, config.seed_spacing);
        let mut rng = Mt19937GenRand64::new(config.seed);

        let mut generated: Vec<(Path, Vec<(Coord, FloatCoord)>)> = Vec::new();

        while let Some(seed) = pipeline.next_seed(pattern, &coverage, &mut rng, config.seed_spacing, config.print_radius) {
            let (backward, mut commits) = propagate_half(seed, -1.0, pattern, &mut coverage, config, flags, &disk_cache);
            let (forward, forward_commits) = propagate_half(seed, 1.0, pattern, &mut coverage, config, flags, &disk_cache);
            commits.extend(forward_commits);

            let path = Path::join(backward, forward);
            if path.is_seed_only() {
                // No end caps to mark: the path never left its seed, so the
                // best bookkeeping is a plain print-radius disk (§4.G step 3).
                let centre = seed.position.to_coord_rounded();
                for cell in disk_offsets(config.print_radius).into_iter().map(|o| centre + o) {
                    coverage.commit_cell(cell, FloatCoord::ZERO);
                }
                tracing::trace!(x = seed.position.x, y = seed.position.y, "seed produced no path, discarding");
                continue;
            }

            commit_end_caps(&path, config.print_radius, &mut coverage, &mut commits);
            generated.push((path, commits));
        }

        tracing::debug!(count = generated.len(), "generated raw paths before post-processing");

        let min_length = 2.0 * config.print_radius * flags.min_line_length_multiplier;
        let mut paths = Vec::with_capacity(generated.len());
        for (path, commits) in generated {
            let drop_as_isolated = flags.drop_isolated_points && path.len() <= 1;
            let drop_as_short = min_length > 0.0 && path_length(&path) < min_length;
            if drop_as_isolated || drop_as_short {
                for (cell, contribution) in commits {
                    coverage.rewind_cell(cell, contribution);
                }
                continue;
            }
            paths.push(path);
        }

        tracing::info!(count = paths.len(), "finished path generation");
        Ok(Self { paths, coverage })
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::{FillingMethod, SplayLineBoundaryPolicy};
    use core_field::DirectorField;

    fn pattern(width: usize, height: usize) -> DesiredPattern {
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 1).unwrap()
    }

    #[test]
    fn fills_a_uniform_square_with_at_least_one_path() {
        let desired = pattern(80, 80);
        let config = FillingConfig::new(FillingMethod::Perimeter, 4.0, 8.0, 4.0, 10.0, 0.2, 0.3, 42).unwrap();
        let flags = FillingFlags::default();
        let filled = FilledPattern::generate(&desired, &config, &flags).unwrap();
        assert!(!filled.paths().is_empty());
        assert!(filled.coverage().fills().iter().any(|&f| f > 0));
    }

    #[test]
    fn rejects_an_invalid_filling_config_up_front() {
        let desired = pattern(40, 40);
        let flags = FillingFlags::default();
        let mut config = FillingConfig::new(FillingMethod::Perimeter, 4.0, 8.0, 4.0, 10.0, 0.0, 0.0, 1).unwrap();
        config.seed_spacing = 1.0;
        let err = FilledPattern::generate(&desired, &config, &flags);
        assert!(err.is_err());
    }
}

use core_config::{DiscontinuityPolicy, FillingConfig, FillingFlags};
use core_geometry::{sweep_quadrilateral, Coord, FloatCoord};
use core_pattern::DesiredPattern;
use core_path::{Path, SeedPoint};

use crate::coverage::Coverage;
use crate::disk_cache::DiskCache;
use crate::repulsion::compute_repulsion;
use crate::terminability::is_terminable;

const MAX_PROPAGATION_STEPS: usize = 100_000;
const MIN_STEP_LENGTH: f64 = 2.0;

/// One accepted step: the new tangent direction (pre-repulsion, used for the
/// next offset edge) together with whether it crossed the discontinuity
/// threshold.
struct Candidate {
    blended_tangent: FloatCoord,
    candidate_tangent: FloatCoord,
}

/// Samples the director at `position`, disambiguates its sign against
/// `prev_tangent` (the field is headless), and blends it with the previous
/// tangent via a normalised resultant (§4.G "tangent blending").
fn sample_candidate(position: FloatCoord, prev_tangent: FloatCoord, pattern: &DesiredPattern) -> Option<Candidate> {
    let raw = pattern.director().interpolate(position);
    if raw.norm() < 1e-6 {
        return None;
    }
    let candidate_tangent = if raw.dot(prev_tangent) < 0.0 { -raw } else { raw }.normalised();
    let mut blended_tangent = (prev_tangent + candidate_tangent).normalised();
    if blended_tangent == FloatCoord::ZERO {
        blended_tangent = candidate_tangent;
    }
    Some(Candidate { blended_tangent, candidate_tangent })
}

fn is_discontinuous(prev_tangent: FloatCoord, candidate_tangent: FloatCoord, flags: &FillingFlags) -> bool {
    let agreement = if flags.vector_filling {
        prev_tangent.dot(candidate_tangent)
    } else {
        prev_tangent.dot(candidate_tangent).abs()
    };
    agreement < flags.discontinuity_angle_threshold_radians.cos()
}

/// Tries successively shorter step lengths (down to `MIN_STEP_LENGTH`) until
/// one produces a continuous candidate, applying `flags.discontinuity_policy`
/// (§4.G "Discontinuity handling"). `Stick` remembers the first discontinuous
/// candidate encountered and falls back to it if every length is
/// discontinuous; `Terminate` gives up outright; `Ignore` accepts the first
/// sampled candidate regardless of continuity.
fn resolve_step(
    position: FloatCoord,
    prev_tangent: FloatCoord,
    step_length: f64,
    pattern: &DesiredPattern,
    flags: &FillingFlags,
) -> Option<(Candidate, f64)> {
    let mut remembered: Option<(Candidate, f64)> = None;
    let mut length = step_length;

    while length >= MIN_STEP_LENGTH {
        let candidate = sample_candidate(position, prev_tangent, pattern)?;
        let discontinuous = is_discontinuous(prev_tangent, candidate.candidate_tangent, flags);

        match flags.discontinuity_policy {
            DiscontinuityPolicy::Ignore => return Some((candidate, length)),
            DiscontinuityPolicy::Terminate => {
                if !discontinuous {
                    return Some((candidate, length));
                }
            }
            DiscontinuityPolicy::Stick => {
                if !discontinuous {
                    return Some((candidate, length));
                }
                if remembered.is_none() {
                    remembered = Some((candidate, length));
                }
            }
        }
        length -= 1.0;
    }

    if flags.discontinuity_policy == DiscontinuityPolicy::Stick {
        return remembered;
    }
    None
}

/// Propagates a path half (forward or backward, `sign = +-1`) from `seed`
/// until a discontinuity can't be resolved, the new cell is terminable, or a
/// step's swept quadrilateral rasterises to nothing (a "bounce", §4.G step
/// 3). Returns the half-path together with the coverage contributions it
/// committed, so the caller can rewind them later if the joined path turns
/// out too short (§4.G post-processing).
pub fn propagate_half(
    seed: SeedPoint,
    sign: f64,
    pattern: &DesiredPattern,
    coverage: &mut Coverage,
    config: &FillingConfig,
    flags: &FillingFlags,
    disk_cache: &DiskCache,
) -> (Path, Vec<(Coord, FloatCoord)>) {
    let initial_dir = pattern.director().interpolate(seed.position);
    let initial_tangent = if initial_dir.norm() < 1e-6 {
        FloatCoord::new(sign, 0.0)
    } else {
        initial_dir.normalised() * sign
    };

    let mut path = Path::new(seed, initial_tangent, config.print_radius);
    if initial_dir.norm() < 1e-6 {
        return (path, Vec::new());
    }

    let mut commits = Vec::new();
    let mut position = seed.position;
    let mut prev_tangent = initial_tangent;
    let mut prev_pos_edge = position + initial_tangent.perpendicular().normalised() * config.print_radius;
    let mut prev_neg_edge = position - initial_tangent.perpendicular().normalised() * config.print_radius;
    let mut first_step = true;

    for _ in 0..MAX_PROPAGATION_STEPS {
        let Some((candidate, length)) = resolve_step(position, prev_tangent, config.step_length, pattern, flags) else {
            break;
        };

        let repulsion = compute_repulsion(
            candidate.blended_tangent,
            position,
            pattern,
            coverage,
            config.print_radius,
            config.repulsion_magnitude,
            config.repulsion_angle,
        );
        let new_position = position + candidate.blended_tangent * length + repulsion;
        let new_cell = new_position.to_coord_rounded();

        if is_terminable(new_cell, candidate.blended_tangent, pattern, coverage, disk_cache.termination_ring()) {
            break;
        }

        let normal = candidate.blended_tangent.perpendicular().normalised() * config.print_radius;
        let new_pos_edge = new_position + normal;
        let new_neg_edge = new_position - normal;

        let cells = sweep_quadrilateral(prev_pos_edge, new_pos_edge, new_neg_edge, prev_neg_edge, !first_step);
        if cells.is_empty() {
            break;
        }

        let mut overlap_sum = 0.0;
        let mut overlap_count = 0usize;
        for cell in cells {
            if let Some(contribution) = coverage.commit_cell(cell, candidate.candidate_tangent) {
                commits.push((cell, contribution));
            }
            overlap_sum += (coverage.fills_at(cell) as f64 - 1.0).max(0.0);
            overlap_count += 1;
        }
        let segment_overlap = if overlap_count > 0 { overlap_sum / overlap_count as f64 } else { 0.0 };

        path.add_point(new_position, new_pos_edge, new_neg_edge, segment_overlap);

        position = new_position;
        prev_tangent = candidate.blended_tangent;
        prev_pos_edge = new_pos_edge;
        prev_neg_edge = new_neg_edge;
        first_step = false;
    }

    (path, commits)
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

    fn config() -> FillingConfig {
        FillingConfig::new(FillingMethod::Perimeter, 4.0, 8.0, 4.0, 8.0, 0.0, 0.0, 1).unwrap()
    }

    #[test]
    fn propagates_forward_along_uniform_director_until_termination() {
        let desired = pattern(60, 60);
        let mut coverage = Coverage::new(desired.width(), desired.height());
        let disk_cache = DiskCache::new(4.0, 4.0);
        let flags = FillingFlags::default();
        let cfg = config();
        let seed = SeedPoint {
            position: FloatCoord::new(10.0, 30.0),
            seed_line_index: 0,
            index_in_line: 0,
        };
        let (path, commits) = propagate_half(seed, 1.0, &desired, &mut coverage, &cfg, &flags, &disk_cache);
        assert!(path.len() > 1);
        assert!(!commits.is_empty());
        for (cell, _) in &commits {
            assert!(coverage.is_filled(*cell));
        }
    }

    #[test]
    fn zero_director_at_seed_yields_a_seed_only_path() {
        let width = 20;
        let height = 20;
        let shape = vec![true; width * height];
        let dx = vec![0.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        let desired = DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 1).unwrap();
        let mut coverage = Coverage::new(desired.width(), desired.height());
        let disk_cache = DiskCache::new(4.0, 4.0);
        let flags = FillingFlags::default();
        let cfg = config();
        let seed = SeedPoint {
            position: FloatCoord::new(10.0, 10.0),
            seed_line_index: 0,
            index_in_line: 0,
        };
        let (path, commits) = propagate_half(seed, 1.0, &desired, &mut coverage, &cfg, &flags, &disk_cache);
        assert!(path.is_seed_only());
        assert!(commits.is_empty());
    }
}

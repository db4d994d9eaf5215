use core_config::FillingMethod;
use core_field::DirectorField;
use core_geometry::Coord;
use core_pattern::DesiredPattern;
use core_path::SeedPoint;
use core_seedlines::SeedLine;
use rand::Rng;

use crate::coverage::Coverage;
use crate::dual_line::trace_dual_line;
use crate::equidistant::extract_equidistant_seeds;

/// Extends one open end of a splay line along the local dual (perpendicular)
/// direction by up to `max_pixels`, stopping at the shape boundary (§4.G
/// "Setup", the `Splay` branch). `inward_neighbour` disambiguates which of
/// the perpendicular's two directions points away from the line.
fn extend_end(
    end: Coord,
    inward_neighbour: Coord,
    pattern: &DesiredPattern,
    max_pixels: i64,
) -> Vec<Coord> {
    let outward_hint = (end - inward_neighbour).as_float();
    let mut sign = 1.0;
    let initial_perp = pattern.director().at(end.x, end.y).perpendicular().normalised();
    if initial_perp.dot(outward_hint) < 0.0 {
        sign = -1.0;
    }

    let mut position = end.as_float();
    let mut extension = Vec::new();
    for _ in 0..max_pixels {
        let dir = pattern.director().interpolate(position).perpendicular().normalised() * sign;
        if dir.norm() < 0.5 {
            break;
        }
        position = position + dir;
        let coord = position.to_coord_rounded();
        if !pattern.is_in_shape(coord) {
            break;
        }
        extension.push(coord);
    }
    extension
}

/// Extends an open splay line at both ends by up to `2 * seed_spacing`
/// pixels; closed lines are returned unchanged (§4.G).
fn extend_splay_line(line: &SeedLine, pattern: &DesiredPattern, seed_spacing: f64) -> SeedLine {
    if line.closed || line.points.len() < 2 {
        return line.clone();
    }
    let max_pixels = (2.0 * seed_spacing).round() as i64;

    let mut front_extension = extend_end(line.points[0], line.points[1], pattern, max_pixels);
    front_extension.reverse();

    let back_extension = extend_end(
        *line.points.last().unwrap(),
        line.points[line.points.len() - 2],
        pattern,
        max_pixels,
    );

    let mut points = front_extension;
    points.extend(line.points.iter().copied());
    points.extend(back_extension);
    SeedLine::new(points, false)
}

/// Tracks the current working set of seed lines and the reseeding buckets
/// (§4.G "State": "the current seed-line index; a stack-like store of
/// remaining seed points"). Owned by a single `FilledPattern` run.
pub struct SeedPipeline {
    seed_lines: Vec<SeedLine>,
    remaining: Vec<SeedPoint>,
    reseed_buckets: Vec<Vec<Coord>>,
    reseeding_enabled: bool,
}

impl SeedPipeline {
    pub fn setup(
        pattern: &DesiredPattern,
        method: FillingMethod,
        seed_spacing: f64,
    ) -> Self {
        let seed_lines = match method {
            FillingMethod::Splay => {
                let lines = pattern.splay_lines();
                if lines.is_empty() {
                    tracing::debug!("no splay lines extracted, falling back to perimeter seeding");
                    pattern.perimeter_lines().to_vec()
                } else {
                    lines
                        .iter()
                        .map(|l| extend_splay_line(l, pattern, seed_spacing))
                        .collect()
                }
            }
            FillingMethod::Perimeter => pattern.perimeter_lines().to_vec(),
            FillingMethod::Dual => Vec::new(),
        };

        Self {
            seed_lines,
            remaining: Vec::new(),
            reseed_buckets: pattern.reseed_buckets().to_vec(),
            reseeding_enabled: true,
        }
    }

    fn pop_bucket_cell(&mut self) -> Option<Coord> {
        while let Some(bucket) = self.reseed_buckets.first_mut() {
            if let Some(cell) = bucket.pop() {
                return Some(cell);
            }
            self.reseed_buckets.remove(0);
        }
        None
    }

    fn refill(
        &mut self,
        pattern: &DesiredPattern,
        coverage: &Coverage,
        rng: &mut impl Rng,
        seed_spacing: f64,
        print_radius: f64,
    ) -> bool {
        if !self.seed_lines.is_empty() {
            let overlapping: Vec<usize> = self
                .seed_lines
                .iter()
                .enumerate()
                .filter(|(_, l)| l.points.iter().any(|&p| coverage.is_filled(p)))
                .map(|(i, _)| i)
                .collect();
            let chosen_idx = if !overlapping.is_empty() {
                overlapping[rng.gen_range(0..overlapping.len())]
            } else {
                rng.gen_range(0..self.seed_lines.len())
            };
            let line = self.seed_lines.remove(chosen_idx);

            let start_index = line
                .points
                .iter()
                .position(|&p| coverage.is_filled(p))
                .unwrap_or_else(|| rng.gen_range(0..line.points.len()));

            let coords = extract_equidistant_seeds(&line, start_index, seed_spacing, pattern.director(), coverage);
            self.remaining = coords
                .into_iter()
                .enumerate()
                .map(|(i, c)| SeedPoint {
                    position: c.as_float(),
                    seed_line_index: chosen_idx,
                    index_in_line: i,
                })
                .collect();
            self.remaining.reverse();
            return true;
        }

        if !self.reseeding_enabled {
            return false;
        }

        while let Some(root) = self.pop_bucket_cell() {
            if !pattern.is_in_shape(root) || coverage.is_filled(root) {
                continue;
            }
            let dual = trace_dual_line(root, pattern.director(), pattern);
            if dual.is_empty() {
                continue;
            }
            let start_index = if (dual.len() as f64) < seed_spacing {
                dual.len() / 2
            } else {
                (print_radius.round() as usize).min(dual.len() - 1)
            };
            let coords = extract_equidistant_seeds(&dual, start_index, seed_spacing, pattern.director(), coverage);
            if coords.is_empty() {
                continue;
            }
            self.remaining = coords
                .into_iter()
                .enumerate()
                .map(|(i, c)| SeedPoint {
                    position: c.as_float(),
                    seed_line_index: usize::MAX,
                    index_in_line: i,
                })
                .collect();
            self.remaining.reverse();
            return true;
        }
        false
    }

    /// Returns the invalid sentinel (`None`) once the seed-line set and the
    /// reseeding buckets are both exhausted (§4.G, §7 "Invalid sentinel").
    pub fn next_seed(
        &mut self,
        pattern: &DesiredPattern,
        coverage: &Coverage,
        rng: &mut impl Rng,
        seed_spacing: f64,
        print_radius: f64,
    ) -> Option<SeedPoint> {
        if let Some(sp) = self.remaining.pop() {
            return Some(sp);
        }
        if !self.refill(pattern, coverage, rng, seed_spacing, print_radius) {
            return None;
        }
        self.remaining.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::SplayLineBoundaryPolicy;
    use rand_mt::Mt19937GenRand64;

    fn pattern(width: usize, height: usize) -> DesiredPattern {
        let shape = vec![true; width * height];
        let dx = vec![1.0; width * height];
        let dy = vec![0.0; width * height];
        let field = DirectorField::new(width, height, dx, dy);
        DesiredPattern::build(width, height, shape, field, None, SplayLineBoundaryPolicy::Centres, 1).unwrap()
    }

    #[test]
    fn perimeter_method_seeds_from_perimeter_lines() {
        let desired = pattern(60, 60);
        let mut pipeline = SeedPipeline::setup(&desired, FillingMethod::Perimeter, 8.0);
        let coverage = Coverage::new(desired.width(), desired.height());
        let mut rng = Mt19937GenRand64::new(1);
        let seed = pipeline.next_seed(&desired, &coverage, &mut rng, 8.0, 4.0);
        assert!(seed.is_some());
    }

    #[test]
    fn dual_method_relies_on_reseed_buckets() {
        let desired = pattern(60, 60);
        let mut pipeline = SeedPipeline::setup(&desired, FillingMethod::Dual, 8.0);
        let coverage = Coverage::new(desired.width(), desired.height());
        let mut rng = Mt19937GenRand64::new(1);
        let seed = pipeline.next_seed(&desired, &coverage, &mut rng, 8.0, 4.0);
        assert!(seed.is_some());
    }
}

use core_config::DisagreementWeights;
use core_engine::FilledPattern;
use core_geometry::Coord;
use core_pattern::DesiredPattern;

/// The four scalar measures of §4.H plus the weighted disagreement they
/// combine into. `disagreement` is what the Bayesian driver minimises;
/// the rest are kept around for the histogram/progress-report outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantifiedConfig {
    pub empty_fraction: f64,
    pub overlap_fraction: f64,
    pub director_disagreement: f64,
    pub path_count: usize,
    pub disagreement: f64,
}

fn empty_fraction(pattern: &DesiredPattern, filled: &FilledPattern) -> f64 {
    let mut shape_cells = 0usize;
    let mut empty_cells = 0usize;
    for y in 0..pattern.height() {
        for x in 0..pattern.width() {
            let p = Coord::new(x as i32, y as i32);
            if !pattern.is_in_shape(p) {
                continue;
            }
            shape_cells += 1;
            if !filled.coverage().is_filled(p) {
                empty_cells += 1;
            }
        }
    }
    if shape_cells == 0 {
        0.0
    } else {
        empty_cells as f64 / shape_cells as f64
    }
}

fn overlap_fraction(filled: &FilledPattern) -> f64 {
    let filled_counts: Vec<u8> = filled.coverage().fills().iter().copied().filter(|&f| f > 0).collect();
    if filled_counts.is_empty() {
        return 0.0;
    }
    let total: f64 = filled_counts.iter().map(|&f| (f as f64 - 1.0).max(0.0)).sum();
    total / filled_counts.len() as f64
}

/// `1 - mean(|(Fx,Fy)·D| / (‖(Fx,Fy)‖·‖D‖))` over filled-and-in-shape cells
/// (§4.H). Cells with a zero accumulated-fill vector or zero director are
/// excluded from the mean rather than penalised, since the cosine is
/// undefined there.
fn director_disagreement(pattern: &DesiredPattern, filled: &FilledPattern) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for y in 0..pattern.height() {
        for x in 0..pattern.width() {
            let p = Coord::new(x as i32, y as i32);
            if !pattern.is_in_shape(p) || !filled.coverage().is_filled(p) {
                continue;
            }
            let accumulated = filled.coverage().director_at(p);
            let director = pattern.director().at(p.x, p.y);
            let (an, dn) = (accumulated.norm(), director.norm());
            if an < 1e-9 || dn < 1e-9 {
                continue;
            }
            sum += accumulated.dot(director).abs() / (an * dn);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        1.0 - sum / count as f64
    }
}

/// Computes the four §4.H measures and the scalar disagreement the
/// Bayesian driver minimises: `max(1, path_count^p_path) * (w_e*empty^p_e +
/// w_o*overlap^p_o + w_d*dirdis^p_d)`.
pub fn compute(pattern: &DesiredPattern, filled: &FilledPattern, weights: &DisagreementWeights) -> QuantifiedConfig {
    let empty = empty_fraction(pattern, filled);
    let overlap = overlap_fraction(filled);
    let dirdis = director_disagreement(pattern, filled);
    let path_count = filled.paths().len();

    let path_factor = (path_count as f64).powf(weights.path_exponent).max(1.0);
    let weighted = weights.empty_spot_weight * empty.powf(weights.empty_spot_exponent)
        + weights.overlap_weight * overlap.powf(weights.overlap_exponent)
        + weights.director_weight * dirdis.powf(weights.director_exponent);

    QuantifiedConfig {
        empty_fraction: empty,
        overlap_fraction: overlap,
        director_disagreement: dirdis,
        path_count,
        disagreement: path_factor * weighted,
    }
}

use std::path::Path as FsPath;

use core_config::{BayesianParameters, DisagreementWeights};
use core_engine::Coverage;
use core_geometry::Coord;
use core_pattern::DesiredPattern;
use core_path::Path as SlicerPath;

use crate::error::IoError;

/// Builds the `#`-prefixed comment header shared by the path-sequence and
/// overlap files: generator identity, the pattern's print diameter, the
/// disagreement weights in force, and the Bayesian search budget that
/// produced the winning configuration. `generated_at` is supplied by the
/// caller so this stays pure and independently testable.
pub fn generate_header(
    pattern_name: &str,
    print_diameter: f64,
    weights: &DisagreementWeights,
    bayesian: &BayesianParameters,
    generated_at: &str,
) -> String {
    let mut header = String::new();
    header.push_str("# Generator: vector-slicer\n");
    header.push_str(&format!("# Pattern: {pattern_name}\n"));
    header.push_str(&format!("# Generated: {generated_at}\n"));
    header.push_str(&format!("# Print diameter: {print_diameter}\n"));
    header.push_str(&format!(
        "# Disagreement weights: empty={:.3}^{:.2} overlap={:.3}^{:.2} director={:.3}^{:.2} path={:.3}^{:.2}\n",
        weights.empty_spot_weight,
        weights.empty_spot_exponent,
        weights.overlap_weight,
        weights.overlap_exponent,
        weights.director_weight,
        weights.director_exponent,
        weights.path_weight,
        weights.path_exponent,
    ));
    header.push_str(&format!(
        "# Bayesian search: total={} improvement={} relearning={}\n",
        bayesian.total_iterations, bayesian.improvement_iterations, bayesian.relearning_period,
    ));
    header
}

fn row_to_string(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(",")
}

/// Writes the path-sequence file (§6): the header, then one
/// `# Start of pattern` / `# End of pattern` block per layer, each
/// containing one row per path with its centreline coordinates rounded to
/// the nearest integer and interleaved `x,y,x,y,...`.
pub fn write_path_sequence(layers: &[Vec<SlicerPath>], out_path: &FsPath, header: &str) -> Result<(), IoError> {
    let mut content = String::from(header);
    for layer in layers {
        content.push_str("# Start of pattern\n");
        for path in layer {
            let row = row_to_string(
                path.nodes()
                    .flat_map(|n| vec![(n.x.round() as i64).to_string(), (n.y.round() as i64).to_string()]),
            );
            content.push_str(&row);
            content.push('\n');
        }
        content.push_str("# End of pattern\n");
    }
    std::fs::write(out_path, content).map_err(|e| IoError::Write { path: out_path.to_path_buf(), source: e })
}

/// Writes the overlap file: same per-layer block structure as the
/// path-sequence file, but each row is a single per-node overlap-fraction
/// table rather than interleaved coordinate pairs.
pub fn write_overlap(layers: &[Vec<SlicerPath>], out_path: &FsPath, header: &str) -> Result<(), IoError> {
    let mut content = String::from(header);
    for layer in layers {
        content.push_str("# Start of pattern\n");
        for path in layer {
            let row = row_to_string(path.overlap().map(|o| format!("{o:.4}")));
            content.push_str(&row);
            content.push('\n');
        }
        content.push_str("# End of pattern\n");
    }
    std::fs::write(out_path, content).map_err(|e| IoError::Write { path: out_path.to_path_buf(), source: e })
}

/// Writes the seeds file: one `x,y` row per path in the winning layer,
/// giving the integer coordinates each path started from.
pub fn write_seeds(paths: &[SlicerPath], out_path: &FsPath) -> Result<(), IoError> {
    let mut content = String::new();
    for path in paths {
        let p = path.seed().position;
        content.push_str(&format!("{},{}\n", p.x.round() as i64, p.y.round() as i64));
    }
    std::fs::write(out_path, content).map_err(|e| IoError::Write { path: out_path.to_path_buf(), source: e })
}

/// Writes the filled-matrix CSV dump: one row per x column, one value per
/// y row, giving how many times (0, 1 or 2, per §4.F's sign-continuity
/// rule) each cell was covered. Matches the row=x convention the input
/// tables use.
pub fn write_filled_matrix(coverage: &Coverage, out_path: &FsPath) -> Result<(), IoError> {
    let mut content = String::new();
    for x in 0..coverage.width() {
        let row = row_to_string((0..coverage.height()).map(|y| coverage.fills_at(Coord::new(x as i32, y as i32)).to_string()));
        content.push_str(&row);
        content.push('\n');
    }
    std::fs::write(out_path, content).map_err(|e| IoError::Write { path: out_path.to_path_buf(), source: e })
}

/// Writes a histogram of per-cell director disagreement (`1 - |F.D|/(|F||D|)`)
/// over filled, in-shape cells, bucketed into `bin_count` equal-width bins
/// spanning `[0, 1]`. Each row is `bin_low,bin_high,count`.
pub fn write_director_disagreement_histogram(
    pattern: &DesiredPattern,
    coverage: &Coverage,
    bin_count: usize,
    out_path: &FsPath,
) -> Result<(), IoError> {
    let mut counts = vec![0u64; bin_count.max(1)];
    for y in 0..pattern.height() {
        for x in 0..pattern.width() {
            let p = Coord::new(x as i32, y as i32);
            if !pattern.is_in_shape(p) || !coverage.is_filled(p) {
                continue;
            }
            let accumulated = coverage.director_at(p);
            let director = pattern.director().at(p.x, p.y);
            let (an, dn) = (accumulated.norm(), director.norm());
            if an < 1e-9 || dn < 1e-9 {
                continue;
            }
            let agreement = accumulated.dot(director).abs() / (an * dn);
            let disagreement = (1.0 - agreement).clamp(0.0, 1.0);
            let bin = ((disagreement * counts.len() as f64) as usize).min(counts.len() - 1);
            counts[bin] += 1;
        }
    }

    let mut content = String::new();
    let n = counts.len();
    for (i, count) in counts.into_iter().enumerate() {
        let lo = i as f64 / n as f64;
        let hi = (i + 1) as f64 / n as f64;
        content.push_str(&format!("{lo},{hi},{count}\n"));
    }
    std::fs::write(out_path, content).map_err(|e| IoError::Write { path: out_path.to_path_buf(), source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_geometry::FloatCoord;
    use core_path::SeedPoint;

    fn single_point_path() -> SlicerPath {
        let seed = SeedPoint { position: FloatCoord::new(1.0, 2.0), seed_line_index: 0, index_in_line: 0 };
        SlicerPath::new(seed, FloatCoord::new(1.0, 0.0), 1.0)
    }

    #[test]
    fn path_sequence_wraps_each_layer_in_markers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sequence.csv");
        let header = "# header\n";
        write_path_sequence(&[vec![single_point_path()]], &out, header).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("# Start of pattern"));
        assert!(text.contains("# End of pattern"));
        assert!(text.contains("1,2"));
    }

    #[test]
    fn seeds_file_lists_one_row_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seeds.csv");
        write_seeds(&[single_point_path(), single_point_path()], &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}

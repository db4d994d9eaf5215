use std::path::Path;

use core_config::SplayLineBoundaryPolicy;
use core_pattern::DesiredPattern;

use crate::csv_table::read_csv_table_f64;
use crate::error::IoError;
use crate::shape::{director_from_theta_table, director_from_xy_tables, shape_from_table, splay_from_pairs_table};

/// Loads a `DesiredPattern` from a pattern directory the way the original
/// tool's directory opener does: `shape.csv` is mandatory, the director
/// comes from `theta_field.csv` if present, otherwise from `xField.csv` +
/// `yField.csv`, and `splay.csv` is used in place of the numerically
/// derived splay field when present.
pub fn load_desired_pattern(
    directory: &Path,
    splay_line_policy: SplayLineBoundaryPolicy,
    rng_seed: u64,
) -> Result<DesiredPattern, IoError> {
    let shape_path = directory.join("shape.csv");
    let theta_path = directory.join("theta_field.csv");
    let x_path = directory.join("xField.csv");
    let y_path = directory.join("yField.csv");
    let splay_path = directory.join("splay.csv");

    let shape_table = read_csv_table_f64(&shape_path)?;
    let (width, height, shape) = shape_from_table(&shape_table, &shape_path)?;

    let director = if theta_path.exists() {
        let table = read_csv_table_f64(&theta_path)?;
        director_from_theta_table(&table, &theta_path)?
    } else if x_path.exists() && y_path.exists() {
        let x_table = read_csv_table_f64(&x_path)?;
        let y_table = read_csv_table_f64(&y_path)?;
        director_from_xy_tables(&x_table, &y_table, &x_path, &y_path)?
    } else {
        return Err(IoError::MalformedCsv {
            path: directory.to_path_buf(),
            value: "neither theta_field.csv nor xField.csv/yField.csv found".to_string(),
        });
    };

    let splay = if splay_path.exists() {
        let table = read_csv_table_f64(&splay_path)?;
        Some(splay_from_pairs_table(&table, &splay_path)?)
    } else {
        None
    };

    DesiredPattern::build(width, height, shape, director, splay, splay_line_policy, rng_seed).map_err(IoError::from)
}

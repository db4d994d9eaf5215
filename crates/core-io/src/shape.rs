use std::path::Path;

use core_field::DirectorField;
use core_field::SplayField;

use crate::csv_table::assert_rectangular;
use crate::error::IoError;

/// Builds the boolean shape mask from a raw table. Per the original reader,
/// a table's rows index the x (width) axis and each row's columns index the
/// y (height) axis — `table[x][y]`, not `table[row][col]` read as `[y][x]`.
/// A non-zero cell means "inside the shape".
pub fn shape_from_table(table: &[Vec<f64>], path: &Path) -> Result<(usize, usize, Vec<bool>), IoError> {
    let height = assert_rectangular(table, path)?;
    let width = table.len();
    let mut shape = vec![false; width * height];
    for (x, row) in table.iter().enumerate() {
        for (y, &value) in row.iter().enumerate() {
            shape[y * width + x] = value != 0.0;
        }
    }
    Ok((width, height, shape))
}

/// Builds a director field from separate x- and y-component tables
/// (`xField.csv` / `yField.csv`), using the same row=x, column=y convention
/// as [`shape_from_table`].
pub fn director_from_xy_tables(
    x_table: &[Vec<f64>],
    y_table: &[Vec<f64>],
    x_path: &Path,
    y_path: &Path,
) -> Result<DirectorField, IoError> {
    let height = assert_rectangular(x_table, x_path)?;
    let width = x_table.len();
    let height_y = assert_rectangular(y_table, y_path)?;
    let width_y = y_table.len();
    if width != width_y || height != height_y {
        return Err(IoError::DimensionMismatch {
            shape_w: width,
            shape_h: height,
            director_w: width_y,
            director_h: height_y,
        });
    }

    let mut dx = vec![0.0; width * height];
    let mut dy = vec![0.0; width * height];
    for x in 0..width {
        for y in 0..height {
            let idx = y * width + x;
            dx[idx] = x_table[x][y];
            dy[idx] = y_table[x][y];
        }
    }
    Ok(DirectorField::new(width, height, dx, dy))
}

/// Builds a director field from a single angle table (`theta_field.csv`),
/// converting each cell's angle in radians into a unit vector.
pub fn director_from_theta_table(table: &[Vec<f64>], path: &Path) -> Result<DirectorField, IoError> {
    let height = assert_rectangular(table, path)?;
    let width = table.len();
    let mut dx = vec![0.0; width * height];
    let mut dy = vec![0.0; width * height];
    for (x, row) in table.iter().enumerate() {
        for (y, &theta) in row.iter().enumerate() {
            let idx = y * width + x;
            dx[idx] = theta.cos();
            dy[idx] = theta.sin();
        }
    }
    Ok(DirectorField::new(width, height, dx, dy))
}

/// Builds a precomputed splay field from `splay.csv`, whose rows each carry
/// `x0, y0, x1, y1, ...` — the splay vector's two components interleaved
/// per row, one pair per y, following the same row=x convention as the
/// other tables.
pub fn splay_from_pairs_table(table: &[Vec<f64>], path: &Path) -> Result<SplayField, IoError> {
    let row_len = assert_rectangular(table, path)?;
    if row_len % 2 != 0 {
        return Err(IoError::MalformedCsv {
            path: path.to_path_buf(),
            value: format!("splay table has an odd column count ({row_len})"),
        });
    }
    let height = row_len / 2;
    let width = table.len();
    let mut sx = vec![0.0; width * height];
    let mut sy = vec![0.0; width * height];
    for (x, row) in table.iter().enumerate() {
        for y in 0..height {
            let idx = y * width + x;
            sx[idx] = row[2 * y];
            sy[idx] = row[2 * y + 1];
        }
    }
    Ok(SplayField::from_raw(width, height, sx, sy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn shape_table_rows_become_the_x_axis() {
        // Two rows (width 2), three columns each (height 3); row 1's middle
        // cell is the only filled one, so it must land at x=1, y=1.
        let table = vec![vec![0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        let (width, height, shape) = shape_from_table(&table, &PathBuf::from("shape.csv")).unwrap();
        assert_eq!((width, height), (2, 3));
        assert!(shape[1 * width + 1]);
        assert_eq!(shape.iter().filter(|&&b| b).count(), 1);
    }

    #[test]
    fn theta_table_becomes_unit_vectors() {
        let table = vec![vec![0.0], vec![std::f64::consts::FRAC_PI_2]];
        let path = PathBuf::from("theta.csv");
        let field = director_from_theta_table(&table, &path).unwrap();
        assert!((field.at(0, 0).x - 1.0).abs() < 1e-9);
        assert!((field.at(1, 0).y - 1.0).abs() < 1e-9);
    }
}

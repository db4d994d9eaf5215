use std::path::Path;

use crate::error::IoError;

fn io_err(path: &Path, error: csv::Error) -> IoError {
    IoError::Read {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, error),
    }
}

/// Reads a headerless comma-separated table of floats (§6 `shape.csv`,
/// `theta_field.csv`, `xField.csv`/`yField.csv`, `splay.csv` all share this
/// shape). `flexible(true)` lets rows carry differing column counts through
/// parsing so a ragged file surfaces as the more specific
/// [`IoError::RaggedTable`] from [`assert_rectangular`] rather than a raw
/// CSV-crate error.
pub fn read_csv_table_f64(path: &Path) -> Result<Vec<Vec<f64>>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| io_err(path, e))?;

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| io_err(path, e))?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let trimmed = field.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value: f64 = trimmed
                .parse()
                .map_err(|_| IoError::MalformedCsv { path: path.to_path_buf(), value: trimmed.to_string() })?;
            row.push(value);
        }
        if !row.is_empty() {
            table.push(row);
        }
    }
    if table.is_empty() {
        return Err(IoError::EmptyTable);
    }
    Ok(table)
}

/// Confirms every row of `table` has the same length, returning it (§4.E
/// implicitly assumes `W x H` rectangularity for every input table). A
/// mismatched row is an `Input-format failure` (§7), fatal for the pattern.
pub fn assert_rectangular(table: &[Vec<f64>], path: &Path) -> Result<usize, IoError> {
    let expected = table[0].len();
    for (row, values) in table.iter().enumerate() {
        if values.len() != expected {
            return Err(IoError::RaggedTable {
                path: path.to_path_buf(),
                row,
                expected,
                actual: values.len(),
            });
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_rectangular_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,0,1").unwrap();
        writeln!(file, "0,1,0").unwrap();
        let table = read_csv_table_f64(file.path()).unwrap();
        assert_eq!(table, vec![vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]);
        assert_eq!(assert_rectangular(&table, file.path()).unwrap(), 3);
    }

    #[test]
    fn rejects_a_ragged_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,0,1").unwrap();
        writeln!(file, "0,1").unwrap();
        let table = read_csv_table_f64(file.path()).unwrap();
        assert!(assert_rectangular(&table, file.path()).is_err());
    }
}

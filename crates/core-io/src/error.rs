use std::path::PathBuf;

use thiserror::Error;

/// External I/O failures (spec component K, §7). `InvalidInput` covers
/// missing/malformed CSV and dimension mismatches between the shape and
/// director/splay tables — fatal for the offending pattern, never for the
/// whole run (the caller catches it per-pattern and moves on).
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: malformed CSV value '{value}'")]
    MalformedCsv { path: PathBuf, value: String },
    #[error("{path}: ragged table, row {row} has {actual} columns, expected {expected}")]
    RaggedTable {
        path: PathBuf,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("director field {director_w}x{director_h} does not match shape {shape_w}x{shape_h}")]
    DimensionMismatch {
        shape_w: usize,
        shape_h: usize,
        director_w: usize,
        director_h: usize,
    },
    #[error("pattern table is empty")]
    EmptyTable,
    #[error(transparent)]
    InvalidConfig(#[from] core_config::ConfigError),
    #[error(transparent)]
    Pattern(#[from] core_pattern::PatternError),
    #[error(transparent)]
    Quantify(#[from] core_quantify::QuantifyError),
    #[error(transparent)]
    Engine(#[from] core_engine::EngineError),
}

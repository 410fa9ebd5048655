use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("row {row} is out of bounds for the loaded table ({rows} rows)")]
    OutOfRange { row: usize, rows: usize },

    #[error("temperature {temperature:.1} not found in temperature value range")]
    TemperatureNotFound { temperature: f64 },

    #[error("yeast type '{yeast_type}' not found in configured yeast types: [{}]", .known.join(", "))]
    UnknownYeastType {
        yeast_type: String,
        known: Vec<String>,
    },

    #[error(
        "invalid fermentation time combination: the time at the given temperatures may be \
         too long or unsupported; check the room and fridge fermentation durations"
    )]
    InvalidFermentation,

    #[error("row {row} has no durations in the configured column range")]
    NoDurations { row: usize },

    #[error("cell at row {row}, column {column} does not hold a number")]
    NotANumber { row: usize, column: usize },

    #[error("line {line}: {message}")]
    Load { line: usize, message: String },

    #[error("temperature {temperature:.1} appears more than once (row {row})")]
    DuplicateTemperature { temperature: f64, row: usize },

    #[error("no temperatures found in rows {start}..{end}")]
    EmptyTemperatureIndex { start: usize, end: usize },

    #[error("failed to read table {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

pub type TableResult<T> = Result<T, TableError>;

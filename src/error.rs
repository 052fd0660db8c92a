use std::io;

use thiserror::Error;

/// Failures raised by the pipeline stages.
///
/// Per-line kinds (`NoMatch`, `InvalidDate`) and per-source kinds (`Schema`,
/// `Csv`, `Io`) are absorbed into the error log by the extractors. Only
/// `Validation` and `MissingField` stop a run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("line does not match the title/value pattern: {line}")]
    NoMatch { line: String },
    #[error("date '{value}' is not in 'Month D, YYYY' format")]
    InvalidDate { value: String },
    #[error("required column '{column}' not found in the dataset")]
    Schema { column: String },
    #[error("validation failed for {table}: {reason}")]
    Validation { table: String, reason: String },
    #[error("record '{title}' is missing required field '{field}'")]
    MissingField { title: String, field: &'static str },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type EtlResult<T> = std::result::Result<T, EtlError>;

//! Data loading errors

use thiserror::Error;

/// Errors raised while loading or storing price data
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Parquet file could not be read or written
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Arrow batch could not be built or decoded
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// A record has an unparseable or invalid field
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: u64, reason: String },
}

impl DataError {
    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

//! Price data loading
//!
//! Reads historical prices from Yahoo CSV exports or Parquet price files

mod parquet;
mod types;
mod yahoo;

pub use self::parquet::{price_point_schema, ParquetReader, ParquetWriter};
pub use types::DataError;
pub use yahoo::{load_csv, read_csv};

use crate::series::PriceSeries;
use std::path::Path;

/// Price file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormat {
    /// Yahoo Finance CSV export
    Csv,
    /// Parquet price file
    Parquet,
}

impl PriceFormat {
    /// Format implied by the file extension; anything but `.parquet` is CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => PriceFormat::Parquet,
            _ => PriceFormat::Csv,
        }
    }
}

/// Load a price series from a CSV or Parquet file
pub fn load_prices(path: impl AsRef<Path>) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let format = PriceFormat::from_path(path);
    tracing::info!(path = ?path, ?format, "Loading price data");

    match format {
        PriceFormat::Csv => load_csv(path),
        PriceFormat::Parquet => ParquetReader::new(path).read_price_series(),
    }
}

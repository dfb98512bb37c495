//! Parquet price files
//!
//! Two columns: `timestamp` (microseconds, UTC) and `price` (`Float64`).

use super::DataError;
use crate::series::{PricePoint, PriceSeries};
use arrow::array::{ArrayRef, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Price point schema fields
pub fn price_point_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new("price", DataType::Float64, false),
    ])
}

/// Writes price points to a Parquet file
pub struct ParquetWriter {
    path: PathBuf,
}

impl ParquetWriter {
    /// Create a new writer for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write all points, creating parent directories as needed
    pub fn write_price_points(&self, points: &[PricePoint]) -> Result<(), DataError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let schema = Arc::new(price_point_schema());
        let file = File::create(&self.path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        let timestamps: Vec<i64> = points
            .iter()
            .map(|p| p.timestamp.timestamp_micros())
            .collect();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC"))
                    as ArrayRef,
                Arc::new(Float64Array::from(prices)) as ArrayRef,
            ],
        )?;

        writer.write(&batch)?;
        writer.close()?;

        tracing::debug!(path = ?self.path, count = points.len(), "Wrote price points to Parquet");

        Ok(())
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads price points from a Parquet file
pub struct ParquetReader {
    path: PathBuf,
}

impl ParquetReader {
    /// Create a new reader for a Parquet file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every price point into a series
    pub fn read_price_series(&self) -> Result<PriceSeries, DataError> {
        let file = File::open(&self.path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let reader = builder.build()?;

        let mut series = PriceSeries::new();
        let mut row: u64 = 0;

        for batch_result in reader {
            let batch = batch_result?;

            let timestamps = batch
                .column(0)
                .as_any()
                .downcast_ref::<TimestampMicrosecondArray>()
                .ok_or_else(|| DataError::malformed(row, "invalid timestamp column"))?;

            let prices = batch
                .column(1)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| DataError::malformed(row, "invalid price column"))?;

            for i in 0..batch.num_rows() {
                row += 1;
                let timestamp = DateTime::from_timestamp_micros(timestamps.value(i))
                    .ok_or_else(|| DataError::malformed(row, "timestamp out of range"))?;
                let price = prices.value(i);
                if !price.is_finite() || price < 0.0 {
                    return Err(DataError::malformed(row, format!("invalid price {price}")));
                }
                series.push(PricePoint::new(timestamp, price));
            }
        }

        tracing::debug!(path = ?self.path, points = series.len(), "Loaded Parquet price series");
        Ok(series)
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Convert command implementation

use crate::data::{load_prices, ParquetWriter};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Yahoo CSV export (or Parquet file) to read
    pub input: PathBuf,

    /// Parquet file to write
    pub output: PathBuf,
}

impl ConvertArgs {
    /// Load the input and write it sorted to Parquet; returns the point count
    pub fn run(&self) -> anyhow::Result<usize> {
        let series = load_prices(&self.input)
            .with_context(|| format!("Failed to load prices from {}", self.input.display()))?;
        ParquetWriter::new(&self.output)
            .write_price_points(series.points())
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(series.len())
    }

    pub async fn execute(self) -> anyhow::Result<()> {
        tracing::info!(input = ?self.input, output = ?self.output, "Converting price data");

        let output = self.output.clone();
        let count = tokio::task::spawn_blocking(move || self.run()).await??;

        tracing::info!(count, output = ?output, "Conversion complete");
        Ok(())
    }
}

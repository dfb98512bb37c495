//! Yahoo Finance historical CSV export
//!
//! Columns: `Date,Open,High,Low,Close,Adj Close,Volume`. The adjusted close is
//! used as the price; dates are taken as midnight UTC.

use super::DataError;
use crate::series::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column holding the date
const DATE_COLUMN: usize = 0;
/// Column holding the adjusted close
const PRICE_COLUMN: usize = 5;
/// Date format of the export
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load a Yahoo CSV export from disk
pub fn load_csv(path: impl AsRef<Path>) -> Result<PriceSeries, DataError> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}

/// Parse a Yahoo CSV export. Header rows are skipped wherever they appear;
/// any other unparseable row fails the whole load.
pub fn read_csv<R: Read>(reader: R) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series = PriceSeries::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let date = record
            .get(DATE_COLUMN)
            .ok_or_else(|| DataError::malformed(line, "missing date column"))?;
        if date == "Date" || (record.len() == 1 && date.is_empty()) {
            continue;
        }

        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| DataError::malformed(line, format!("invalid date {date:?}: {e}")))?;
        let timestamp = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DataError::malformed(line, "invalid time of day"))?
            .and_utc();

        let raw_price = record
            .get(PRICE_COLUMN)
            .ok_or_else(|| DataError::malformed(line, "missing adjusted close column"))?;
        let price: f64 = raw_price
            .parse()
            .map_err(|e| DataError::malformed(line, format!("invalid price {raw_price:?}: {e}")))?;
        if !price.is_finite() || price < 0.0 {
            return Err(DataError::malformed(line, format!("invalid price {price}")));
        }

        series.push(PricePoint::new(timestamp, price));
    }

    tracing::debug!(points = series.len(), "Loaded CSV price series");
    Ok(series)
}

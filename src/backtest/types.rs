//! Backtest types

use crate::series::{PriceSeries, SeriesError};
use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;
use thiserror::Error;

/// Backtest errors
#[derive(Debug, Error)]
pub enum BacktestError {
    /// The investment horizon is longer than the available data
    #[error("horizon of {} days exceeds the {} days of available data", .horizon.num_days(), .available.num_days())]
    InfeasibleWindow { horizon: Duration, available: Duration },
    /// Sliding windows must move by at least one second
    #[error("slide step must be at least one second, got {0}")]
    InvalidSlideStep(Duration),
    /// A required price is missing from the series
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Inclusive time range of a backtest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a new range
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Full range of the series, or its last `recent_years` calendar years
    /// when non-zero
    pub fn of_series(series: &PriceSeries, recent_years: u32) -> Result<Self, SeriesError> {
        let (oldest, newest) = match (series.oldest(), series.newest()) {
            (Some(oldest), Some(newest)) => (oldest, newest),
            _ => return Err(SeriesError::Empty),
        };

        let start = if recent_years > 0 {
            newest
                .checked_sub_months(Months::new(recent_years.saturating_mul(12)))
                .unwrap_or(oldest)
        } else {
            oldest
        };

        Ok(Self::new(start, newest))
    }

    /// Length of the range
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

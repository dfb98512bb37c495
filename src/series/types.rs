//! Price series types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single observed price at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Observed price
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Price lookup errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeriesError {
    /// No sample lies within tolerance of the requested time
    #[error("no price within {tolerance} of {target}")]
    PriceNotFound {
        target: DateTime<Utc>,
        tolerance: Duration,
    },
    /// The series holds no samples
    #[error("price series is empty")]
    Empty,
}

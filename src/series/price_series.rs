//! Time-sorted price samples with tolerant lookup

use super::{PricePoint, SeriesError};
use chrono::{DateTime, Duration, Utc};
use std::sync::OnceLock;

/// Price samples of a single instrument.
///
/// Samples are stored in load order and sorted lazily, exactly once, on the
/// first query or boundary access. The sorted view lives in a `OnceLock`, so a
/// loaded series can be shared by reference across worker threads.
#[derive(Debug, Default)]
pub struct PriceSeries {
    /// Samples in load order
    pending: Vec<PricePoint>,
    /// Sorted samples, populated on first access
    sorted: OnceLock<Vec<PricePoint>>,
}

impl PriceSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from unordered samples
    pub fn load(points: impl IntoIterator<Item = PricePoint>) -> Self {
        Self {
            pending: points.into_iter().collect(),
            sorted: OnceLock::new(),
        }
    }

    /// Append a sample. Drops any sorted view built so far.
    pub fn push(&mut self, point: PricePoint) {
        self.sorted.take();
        self.pending.push(point);
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the sorted view has been built
    pub fn is_sorted(&self) -> bool {
        self.sorted.get().is_some()
    }

    /// Samples sorted ascending by timestamp
    pub fn points(&self) -> &[PricePoint] {
        self.sorted.get_or_init(|| {
            let mut points = self.pending.clone();
            // Stable: equal timestamps keep load order
            points.sort_by_key(|p| p.timestamp);
            tracing::trace!(count = points.len(), "Sorted price series");
            points
        })
    }

    /// Timestamp of the earliest sample
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.points().first().map(|p| p.timestamp)
    }

    /// Timestamp of the most recent sample
    pub fn newest(&self) -> Option<DateTime<Utc>> {
        self.points().last().map(|p| p.timestamp)
    }

    /// Price of the first sample (scanning oldest to newest) that lies at or
    /// before `target` and no more than `tolerance` earlier.
    ///
    /// When `target` precedes the whole series, the earliest sample is used if
    /// it lies no more than `tolerance` after `target`.
    ///
    /// Under a generous tolerance this returns the earliest qualifying sample,
    /// not the nearest one.
    pub fn price_at(&self, target: DateTime<Utc>, tolerance: Duration) -> Result<f64, SeriesError> {
        let points = self.points();

        // First sample not older than `target - tolerance`. Every earlier sample
        // fails the tolerance check and every later one lies further from the
        // start of the window, so this is the sample a linear scan would hit.
        let window_start = target - tolerance;
        let idx = points.partition_point(|p| p.timestamp < window_start);
        if let Some(p) = points.get(idx) {
            if p.timestamp <= target {
                return Ok(p.price);
            }
        }

        if let Some(first) = points.first() {
            let ahead = first.timestamp - target;
            if ahead >= Duration::zero() && ahead <= tolerance {
                return Ok(first.price);
            }
        }

        Err(SeriesError::PriceNotFound { target, tolerance })
    }

    /// Price of the most recent sample at or before `target` that is no more
    /// than `max_age` old
    pub fn latest_price_at_or_before(
        &self,
        target: DateTime<Utc>,
        max_age: Duration,
    ) -> Result<f64, SeriesError> {
        let points = self.points();
        let idx = points.partition_point(|p| p.timestamp <= target);
        match idx.checked_sub(1).and_then(|i| points.get(i)) {
            Some(p) if target - p.timestamp <= max_age => Ok(p.price),
            _ => Err(SeriesError::PriceNotFound {
                target,
                tolerance: max_age,
            }),
        }
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::load(iter)
    }
}

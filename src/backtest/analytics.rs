//! Run results and sample-set aggregation

use super::DateRange;
use crate::strategy::{StrategyKind, StrategyOutcome};
use chrono::Duration;
use serde::{Serialize, Serializer};

fn serialize_hours<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_hours())
}

fn serialize_days<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_days())
}

/// Summary of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Strategy that produced the run
    pub strategy: StrategyKind,
    /// Time between investment steps
    #[serde(rename = "interval_hours", serialize_with = "serialize_hours")]
    pub interval: Duration,
    /// Number of scheduled steps
    pub steps: usize,
    /// Whole shares owned at the end
    pub shares_owned: i64,
    /// Money spent including fees
    pub money_spent: f64,
    /// Value of the shares at the end of the range
    pub final_value: f64,
    /// Lowest fee-inclusive spend of a single step
    pub lowest_step_spend: Option<f64>,
    /// Highest fee-inclusive spend of a single step
    pub highest_step_spend: Option<f64>,
    /// Steps skipped for lack of a usable price
    pub skipped_steps: usize,
}

impl RunResult {
    /// Combine a strategy outcome with the closing price of the range
    pub fn new(
        strategy: StrategyKind,
        interval: Duration,
        steps: usize,
        outcome: StrategyOutcome,
        final_price: f64,
    ) -> Self {
        Self {
            strategy,
            interval,
            steps,
            shares_owned: outcome.shares_owned,
            money_spent: outcome.money_spent,
            final_value: outcome.shares_owned as f64 * final_price,
            lowest_step_spend: outcome.lowest_step_spend,
            highest_step_spend: outcome.highest_step_spend,
            skipped_steps: outcome.skipped_steps,
        }
    }

    /// Final value per unit of money spent
    pub fn value_to_spent(&self) -> Option<f64> {
        (self.money_spent != 0.0).then(|| self.final_value / self.money_spent)
    }
}

/// Median and mean of the runs of one strategy at one interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Number of runs aggregated
    pub samples: usize,
    /// Run with the median final value (upper middle for even counts)
    pub median: RunResult,
    /// Component-wise mean of all runs
    pub mean: RunResult,
}

impl AggregateResult {
    /// Aggregate a sample set. Returns `None` for an empty set.
    ///
    /// Samples are ordered by final value; the median is the element at
    /// index `len / 2`. Strategy, interval and steps are taken from the median.
    pub fn from_samples(mut samples: Vec<RunResult>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        samples.sort_by(|a, b| a.final_value.total_cmp(&b.final_value));
        let median = samples[samples.len() / 2].clone();

        let n = samples.len() as f64;
        let mean_of = |f: fn(&RunResult) -> f64| samples.iter().map(f).sum::<f64>() / n;

        let mean = RunResult {
            shares_owned: mean_of(|r| r.shares_owned as f64).round() as i64,
            money_spent: mean_of(|r| r.money_spent),
            final_value: mean_of(|r| r.final_value),
            lowest_step_spend: mean_present(samples.iter().map(|r| r.lowest_step_spend)),
            highest_step_spend: mean_present(samples.iter().map(|r| r.highest_step_spend)),
            skipped_steps: mean_of(|r| r.skipped_steps as f64).round() as usize,
            ..median.clone()
        };

        Some(Self {
            samples: samples.len(),
            median,
            mean,
        })
    }
}

/// Mean of the values that are present
fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Results of a fixed-range sweep
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    /// Simulated range
    pub range: DateRange,
    /// Money invested (DCA) or targeted (VA) over the range
    pub total_to_invest: f64,
    /// One result per strategy and interval
    pub results: Vec<RunResult>,
}

/// Results of a sliding-window sweep
#[derive(Debug, Clone, Serialize)]
pub struct SlidingReport {
    /// Data range the windows were taken from
    pub range: DateRange,
    /// Length of every window
    #[serde(rename = "horizon_days", serialize_with = "serialize_days")]
    pub horizon: Duration,
    /// Money invested (DCA) or targeted (VA) per window
    pub total_to_invest: f64,
    /// Windows generated
    pub windows: usize,
    /// Windows dropped because they could not be valued
    pub skipped_windows: usize,
    /// One aggregate per strategy and interval
    pub aggregates: Vec<AggregateResult>,
}

//! Backtesting module
//!
//! Sweeps every strategy over the candidate intervals, either once over a
//! fixed date range or over many sliding historical windows with median and
//! mean aggregation.

mod analytics;
mod report;
mod sweep;
mod types;

pub use analytics::{AggregateResult, RangeReport, RunResult, SlidingReport};
pub use report::duration_label;
pub use sweep::{
    horizon_years, month_interval, sliding_windows, BacktestDriver, SweepSettings,
    DAYS_PER_HORIZON_YEAR, DEFAULT_INTERVAL_MONTHS, HOURS_PER_MONTH,
};
pub use types::{BacktestError, DateRange};

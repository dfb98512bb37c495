//! Fixed-range and sliding-window sweeps over candidate intervals

use super::{AggregateResult, BacktestError, DateRange, RangeReport, RunResult, SlidingReport};
use crate::series::{PriceSeries, SeriesError};
use crate::strategy::{
    DollarCostAveraging, FeeSchedule, ProtectedValueAveraging, ProtectionParams, StepPlan,
    Strategy, StrategyKind, ValueAveraging,
};
use crate::telemetry;
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

/// Hours in a calendar-approximate month
pub const HOURS_PER_MONTH: i64 = 30 * 24;

/// Candidate intervals in months
pub const DEFAULT_INTERVAL_MONTHS: [u32; 9] = [1, 2, 3, 6, 8, 12, 18, 24, 48];

/// Days in a horizon year
pub const DAYS_PER_HORIZON_YEAR: i64 = 365;

/// Interval of `months` calendar-approximate months
pub fn month_interval(months: u32) -> Duration {
    Duration::hours(i64::from(months) * HOURS_PER_MONTH)
}

/// Horizon of `years` years of 365 days
pub fn horizon_years(years: u32) -> Duration {
    Duration::days(i64::from(years) * DAYS_PER_HORIZON_YEAR)
}

/// Sweep parameters shared by every run
#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Money invested (DCA) or targeted (VA) over a whole range
    pub total_to_invest: f64,
    /// Fixed fee per step
    pub fixed_fee: f64,
    /// Fee as a fraction of the money transacted
    pub percent_fee: f64,
    /// Yearly fee as a fraction of the holdings value
    pub yearly_value_fee: f64,
    /// Candidate intervals between steps
    pub intervals: Vec<Duration>,
    /// Tolerance of the closing price lookup
    pub valuation_tolerance: Duration,
    /// Distance between consecutive sliding windows; also the furthest a
    /// closing price may lie before a range end that has no sample
    pub slide_step: Duration,
    /// Run sliding windows on the rayon pool
    pub parallel: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            total_to_invest: 100.0,
            fixed_fee: 0.0,
            percent_fee: 0.0,
            yearly_value_fee: 0.0,
            intervals: DEFAULT_INTERVAL_MONTHS.iter().map(|&m| month_interval(m)).collect(),
            valuation_tolerance: Duration::hours(24),
            slide_step: Duration::days(7),
            parallel: true,
        }
    }
}

impl SweepSettings {
    /// Fees for runs stepping every `interval`; the yearly value fee is scaled
    /// to the interval over a 360-day year
    pub fn fees_for(&self, interval: Duration) -> FeeSchedule {
        let year_hours = (12 * HOURS_PER_MONTH) as f64;
        FeeSchedule {
            fixed: self.fixed_fee,
            percent: self.percent_fee,
            periodic_value: interval.num_hours() as f64 / year_hours * self.yearly_value_fee,
        }
    }

    /// Plan for stepping through `range` every `interval`, or `None` when not
    /// even one step fits
    pub fn plan_for(&self, range: &DateRange, interval: Duration) -> Option<StepPlan> {
        let interval_secs = interval.num_seconds();
        let span_secs = range.span().num_seconds();
        if interval_secs <= 0 || span_secs < interval_secs {
            return None;
        }

        let steps = (span_secs / interval_secs) as usize;
        Some(StepPlan {
            start: range.start,
            interval,
            steps,
            amount_per_step: self.total_to_invest / steps as f64,
            fees: self.fees_for(interval),
        })
    }
}

/// Windows of length `horizon` sliding back from the end of `range`.
///
/// The first window ends at `range.end`; each following one ends `step`
/// earlier, for as many whole steps as fit in the slack between the span and
/// the horizon. Steps are counted in whole seconds, so shorter steps are
/// rejected.
pub fn sliding_windows(
    range: &DateRange,
    horizon: Duration,
    step: Duration,
) -> Result<Vec<DateRange>, BacktestError> {
    if step < Duration::seconds(1) {
        return Err(BacktestError::InvalidSlideStep(step));
    }

    let available = range.span();
    if available < horizon {
        return Err(BacktestError::InfeasibleWindow { horizon, available });
    }

    let slide_count = (available - horizon).num_seconds() / step.num_seconds();
    let windows = (0..=slide_count)
        .map(|k| {
            let end = range.end - Duration::seconds(step.num_seconds() * k);
            DateRange::new(end - horizon, end)
        })
        .collect();

    Ok(windows)
}

/// Runs every strategy at every candidate interval
pub struct BacktestDriver {
    settings: SweepSettings,
    strategies: Vec<Box<dyn Strategy>>,
}

impl BacktestDriver {
    /// Driver running dollar-cost and value averaging
    pub fn new(settings: SweepSettings) -> Self {
        Self {
            settings,
            strategies: vec![Box::new(DollarCostAveraging), Box::new(ValueAveraging)],
        }
    }

    /// Also run protected value averaging
    pub fn with_protection(self, params: ProtectionParams) -> Self {
        self.with_strategy(Box::new(ProtectedValueAveraging::new(params)))
    }

    /// Add a strategy to every run
    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Sweep settings
    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Strategies run for every interval
    pub fn strategies(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.strategies.iter().map(|s| s.kind())
    }

    /// Price the holdings are valued at when `range` ends.
    ///
    /// Ends falling on weekends or market holidays have no sample within the
    /// valuation tolerance; they take the last close of the preceding slide
    /// step instead.
    pub fn closing_price(&self, series: &PriceSeries, end: DateTime<Utc>) -> Result<f64, SeriesError> {
        series
            .price_at(end, self.settings.valuation_tolerance)
            .or_else(|miss| {
                let lookback = self.settings.slide_step.max(self.settings.valuation_tolerance);
                series.latest_price_at_or_before(end, lookback).map_err(|_| miss)
            })
    }

    /// Run every strategy once per candidate interval over `range`.
    ///
    /// Holdings are valued at the closing price of the range; a missing
    /// closing price fails the whole range.
    pub fn run_range(
        &self,
        series: &PriceSeries,
        range: &DateRange,
    ) -> Result<Vec<RunResult>, BacktestError> {
        let final_price = self.closing_price(series, range.end)?;
        let mut results = Vec::with_capacity(self.settings.intervals.len() * self.strategies.len());

        for &interval in &self.settings.intervals {
            let Some(plan) = self.settings.plan_for(range, interval) else {
                tracing::debug!(
                    interval_hours = interval.num_hours(),
                    span_days = range.span().num_days(),
                    "Interval longer than range, skipping"
                );
                continue;
            };

            for strategy in &self.strategies {
                let outcome = strategy.simulate(series, &plan);
                results.push(RunResult::new(
                    strategy.kind(),
                    interval,
                    plan.steps,
                    outcome,
                    final_price,
                ));
            }
        }

        Ok(results)
    }

    /// Fixed-range sweep with timing and logging
    pub fn sweep_range(
        &self,
        series: &PriceSeries,
        range: DateRange,
    ) -> Result<RangeReport, BacktestError> {
        let started = Instant::now();
        tracing::info!(start = %range.start, end = %range.end, "Running fixed-range sweep");

        let results = self.run_range(series, &range)?;
        if results.is_empty() {
            tracing::warn!(
                span_days = range.span().num_days(),
                "No candidate interval fits in the range"
            );
        }

        telemetry::record_sweep_duration("range", started.elapsed());
        Ok(RangeReport {
            range,
            total_to_invest: self.settings.total_to_invest,
            results,
        })
    }

    /// Sliding-window sweep: run a fixed-range sweep for every window of
    /// length `horizon` and aggregate the runs per strategy and interval.
    ///
    /// Fails before any simulation when the horizon does not fit in `range`.
    /// Windows without a closing price are skipped and counted.
    pub fn sweep_sliding(
        &self,
        series: &PriceSeries,
        range: DateRange,
        horizon: Duration,
    ) -> Result<SlidingReport, BacktestError> {
        let started = Instant::now();
        let windows = sliding_windows(&range, horizon, self.settings.slide_step)?;
        tracing::info!(
            windows = windows.len(),
            horizon_days = horizon.num_days(),
            parallel = self.settings.parallel,
            "Running sliding-window sweep"
        );

        // Sort once before the workers share the series
        series.points();

        let outcomes: Vec<Result<Vec<RunResult>, BacktestError>> = if self.settings.parallel {
            windows
                .par_iter()
                .map(|window| self.run_range(series, window))
                .collect()
        } else {
            windows
                .iter()
                .map(|window| self.run_range(series, window))
                .collect()
        };

        let mut sample_sets: BTreeMap<(Duration, StrategyKind), Vec<RunResult>> = BTreeMap::new();
        let mut skipped_windows = 0;

        for (window, outcome) in windows.iter().zip(outcomes) {
            match outcome {
                Ok(results) => {
                    for result in results {
                        sample_sets
                            .entry((result.interval, result.strategy))
                            .or_default()
                            .push(result);
                    }
                }
                Err(BacktestError::Series(e)) => {
                    skipped_windows += 1;
                    tracing::warn!(end = %window.end, error = %e, "Skipping window without closing price");
                    telemetry::record_skipped_window();
                }
                Err(e) => return Err(e),
            }
        }

        let aggregates: Vec<AggregateResult> = sample_sets
            .into_values()
            .filter_map(AggregateResult::from_samples)
            .collect();

        if aggregates.is_empty() {
            tracing::warn!(skipped_windows, "Sliding sweep produced no results");
        }

        telemetry::record_sweep_duration("sliding", started.elapsed());
        Ok(SlidingReport {
            range,
            horizon,
            total_to_invest: self.settings.total_to_invest,
            windows: windows.len(),
            skipped_windows,
            aggregates,
        })
    }
}

//! Human-readable rendering of sweep reports

use super::{AggregateResult, RangeReport, RunResult, SlidingReport};
use chrono::Duration;
use rust_decimal::Decimal;
use std::fmt::Write;

const RULE: &str = "══════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────";

/// Duration as `XyYmZd` with 30-day months and 360-day years
pub fn duration_label(d: Duration) -> String {
    const DAY_HOURS: i64 = 24;
    const MONTH_HOURS: i64 = DAY_HOURS * 30;
    const YEAR_HOURS: i64 = MONTH_HOURS * 12;

    let mut h = d.num_hours();
    let years = h / YEAR_HOURS;
    h %= YEAR_HOURS;
    let months = h / MONTH_HOURS;
    h %= MONTH_HOURS;
    let days = h / DAY_HOURS;

    let mut out = String::new();
    if years > 0 {
        out.push_str(&format!("{years}y"));
    }
    if months > 0 {
        out.push_str(&format!("{months}m"));
    }
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    out
}

/// Currency rounded to cents
fn money(value: f64) -> Decimal {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// `value` as a percentage of `base`
fn percent_of(value: f64, base: f64) -> Decimal {
    if base == 0.0 {
        return Decimal::ZERO;
    }
    money(100.0 / base * value)
}

fn optional_money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", money(v)))
}

/// One result line: shares, spend, final value and its share of `invested`
fn run_line(run: &RunResult, invested: f64) -> String {
    let ratio = run
        .value_to_spent()
        .map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"));
    let mut line = format!(
        "shares {:>6}  spent {:>12.2}  value {:>12.2} ({:>7.2} %)  value/spent {}",
        run.shares_owned,
        money(run.money_spent),
        money(run.final_value),
        percent_of(run.final_value, invested),
        ratio,
    );
    if run.skipped_steps > 0 {
        let _ = write!(line, "  [{} steps skipped]", run.skipped_steps);
    }
    line
}

/// Highest and lowest single-step spend relative to the planned amount
fn extremes_line(run: &RunResult, planned: f64) -> String {
    let pct = |v: Option<f64>| {
        v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2} %", percent_of(v, planned)))
    };
    format!(
        "highest step {} ({} planned), lowest step {} ({} planned)",
        optional_money(run.highest_step_spend),
        pct(run.highest_step_spend),
        optional_money(run.lowest_step_spend),
        pct(run.lowest_step_spend),
    )
}

fn planned_per_step(total: f64, steps: usize) -> f64 {
    if steps == 0 {
        0.0
    } else {
        total / steps as f64
    }
}

impl RangeReport {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(
            out,
            "  FIXED-RANGE BACKTEST  {} - {}",
            self.range.start.format("%Y-%m-%d"),
            self.range.end.format("%Y-%m-%d")
        );
        let _ = writeln!(out, "  Investing or going to own {:.2}", money(self.total_to_invest));
        let _ = writeln!(out, "{RULE}");

        let mut current: Option<Duration> = None;
        for run in &self.results {
            if current != Some(run.interval) {
                current = Some(run.interval);
                let _ = writeln!(out);
                let _ = writeln!(
                    out,
                    "INTERVAL {}, {} steps",
                    duration_label(run.interval),
                    run.steps
                );
                let _ = writeln!(out, "{THIN_RULE}");
            }
            let _ = writeln!(
                out,
                " - {:<7} {}",
                run.strategy.to_string(),
                run_line(run, self.total_to_invest)
            );
            let _ = writeln!(
                out,
                "   {:<7} {}",
                "",
                extremes_line(run, planned_per_step(self.total_to_invest, run.steps))
            );
        }
        out
    }
}

impl SlidingReport {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(
            out,
            "  SLIDING-WINDOW BACKTEST  {} - {}",
            self.range.start.format("%Y-%m-%d"),
            self.range.end.format("%Y-%m-%d")
        );
        let _ = writeln!(
            out,
            "  Horizon {}, {} windows ({} skipped)",
            duration_label(self.horizon),
            self.windows,
            self.skipped_windows
        );
        let _ = writeln!(out, "  Investing or going to own {:.2}", money(self.total_to_invest));
        let _ = writeln!(out, "{RULE}");

        let mut current: Option<Duration> = None;
        for agg in &self.aggregates {
            let AggregateResult {
                samples,
                median,
                mean,
            } = agg;
            if current != Some(median.interval) {
                current = Some(median.interval);
                let _ = writeln!(out);
                let _ = writeln!(
                    out,
                    "INTERVAL {}, {} steps, {} samples",
                    duration_label(median.interval),
                    median.steps,
                    samples
                );
                let _ = writeln!(out, "{THIN_RULE}");
            }
            let planned = planned_per_step(self.total_to_invest, median.steps);
            let _ = writeln!(
                out,
                " - {:<7} median {}",
                median.strategy.to_string(),
                run_line(median, self.total_to_invest)
            );
            let _ = writeln!(out, "   {:<7} mean   {}", "", run_line(mean, self.total_to_invest));
            let _ = writeln!(out, "   {:<7} mean   {}", "", extremes_line(mean, planned));
        }
        out
    }
}

//! Backtest metrics
//!
//! Recorded through the `metrics` facade; they stay no-ops unless the
//! embedding application installs a recorder.

use crate::strategy::StrategyKind;
use std::time::Duration;

/// Steps skipped because no usable price was found
const SKIPPED_STEPS: &str = "avg_backtest_skipped_steps_total";
/// Protective put purchases
const OPTION_PURCHASES: &str = "avg_backtest_option_purchases_total";
/// Windows dropped from a sliding sweep
const SKIPPED_WINDOWS: &str = "avg_backtest_skipped_windows_total";
/// Wall time of a complete sweep
const SWEEP_DURATION: &str = "avg_backtest_sweep_duration_seconds";

/// Count a skipped simulation step
pub fn record_skipped_step(strategy: StrategyKind) {
    ::metrics::counter!(SKIPPED_STEPS, "strategy" => strategy.as_str()).increment(1);
}

/// Count a protective put purchase
pub fn record_option_purchase() {
    ::metrics::counter!(OPTION_PURCHASES).increment(1);
}

/// Count a sliding window that could not be valued
pub fn record_skipped_window() {
    ::metrics::counter!(SKIPPED_WINDOWS).increment(1);
}

/// Record how long a sweep took
pub fn record_sweep_duration(mode: &'static str, duration: Duration) {
    ::metrics::histogram!(SWEEP_DURATION, "mode" => mode).record(duration.as_secs_f64());
    tracing::debug!(
        metric = SWEEP_DURATION,
        mode,
        value_ms = duration.as_millis() as u64,
        "Recording sweep duration"
    );
}

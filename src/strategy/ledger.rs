//! Running totals shared by the step simulators

use super::{StrategyKind, StrategyOutcome};
use crate::series::SeriesError;
use crate::telemetry;

/// Accumulates shares, spend and per-step extremes over a run
#[derive(Debug)]
pub struct StepLedger {
    kind: StrategyKind,
    shares: i64,
    spent: f64,
    lowest: Option<f64>,
    highest: Option<f64>,
    skipped: usize,
}

impl StepLedger {
    /// Start an empty ledger for the given strategy
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            shares: 0,
            spent: 0.0,
            lowest: None,
            highest: None,
            skipped: 0,
        }
    }

    /// Shares currently owned
    pub fn shares(&self) -> i64 {
        self.shares
    }

    /// Add (or, when negative, remove) shares
    pub fn trade(&mut self, shares: i64) {
        self.shares += shares;
    }

    /// Book the fee-inclusive spend of one step
    pub fn record_spend(&mut self, spend: f64) {
        self.spent += spend;
        self.lowest = Some(self.lowest.map_or(spend, |low| low.min(spend)));
        self.highest = Some(self.highest.map_or(spend, |high| high.max(spend)));
    }

    /// Count a step that produced no trade because no price was usable
    pub fn skip(&mut self, step: usize, reason: &SeriesError) {
        self.skipped += 1;
        tracing::debug!(strategy = self.kind.as_str(), step, %reason, "Skipping step");
        telemetry::record_skipped_step(self.kind);
    }

    /// Count a step skipped for a reason other than a price lookup miss
    pub fn skip_unaffordable(&mut self, step: usize, price: f64) {
        self.skipped += 1;
        tracing::debug!(
            strategy = self.kind.as_str(),
            step,
            price,
            "Cannot buy a whole share this step"
        );
        telemetry::record_skipped_step(self.kind);
    }

    /// Close the ledger
    pub fn finish(self) -> StrategyOutcome {
        StrategyOutcome {
            shares_owned: self.shares,
            money_spent: self.spent,
            lowest_step_spend: self.lowest,
            highest_step_spend: self.highest,
            skipped_steps: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger_has_no_extremes() {
        let outcome = StepLedger::new(StrategyKind::Dca).finish();
        assert_eq!(outcome.shares_owned, 0);
        assert!(outcome.lowest_step_spend.is_none());
        assert!(outcome.highest_step_spend.is_none());
    }

    #[test]
    fn test_first_spend_sets_both_extremes() {
        let mut ledger = StepLedger::new(StrategyKind::ValueAveraging);
        ledger.record_spend(-50.0);
        let outcome = ledger.finish();
        assert_eq!(outcome.lowest_step_spend, Some(-50.0));
        assert_eq!(outcome.highest_step_spend, Some(-50.0));
    }

    #[test]
    fn test_extremes_track_min_and_max() {
        let mut ledger = StepLedger::new(StrategyKind::ValueAveraging);
        for spend in [100.0, 250.0, -30.0, 80.0] {
            ledger.record_spend(spend);
        }
        ledger.trade(5);
        ledger.trade(-2);
        let outcome = ledger.finish();
        assert_eq!(outcome.shares_owned, 3);
        assert_eq!(outcome.money_spent, 400.0);
        assert_eq!(outcome.lowest_step_spend, Some(-30.0));
        assert_eq!(outcome.highest_step_spend, Some(250.0));
    }
}

//! Dollar-cost averaging

use super::{StepLedger, StepPlan, Strategy, StrategyKind, StrategyOutcome};
use crate::series::PriceSeries;

/// Invests a fixed amount of money every step, buying whole shares
#[derive(Debug, Clone, Copy, Default)]
pub struct DollarCostAveraging;

impl Strategy for DollarCostAveraging {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Dca
    }

    fn simulate(&self, series: &PriceSeries, plan: &StepPlan) -> StrategyOutcome {
        let mut ledger = StepLedger::new(self.kind());

        for step in 0..plan.steps {
            let price = match series.price_at(plan.step_time(step), plan.tolerance()) {
                Ok(price) => price,
                Err(e) => {
                    ledger.skip(step, &e);
                    continue;
                }
            };

            let shares = (plan.amount_per_step / price).round();
            if !shares.is_finite() || shares < 0.0 {
                ledger.skip_unaffordable(step, price);
                continue;
            }

            ledger.trade(shares as i64);
            let spend = shares * price;
            let holdings_value = ledger.shares() as f64 * price;
            ledger.record_spend(plan.fees.apply(step, spend, holdings_value));
        }

        ledger.finish()
    }
}

//! Value averaging

use super::{StepLedger, StepPlan, Strategy, StrategyKind, StrategyOutcome};
use crate::series::PriceSeries;

/// Buys or sells whole shares every step so the portfolio value tracks a
/// target growing by `amount_per_step` each step
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueAveraging;

impl Strategy for ValueAveraging {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ValueAveraging
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

            let shares = match rebalance_shares(ledger.shares(), price, price, step, plan.amount_per_step) {
                Some(shares) => shares,
                None => {
                    ledger.skip_unaffordable(step, price);
                    continue;
                }
            };

            ledger.trade(shares);
            let spend = shares as f64 * price;
            let holdings_value = ledger.shares() as f64 * price;
            ledger.record_spend(plan.fees.apply(step, spend, holdings_value));
        }

        ledger.finish()
    }
}

/// Whole shares to trade so the portfolio reaches its target value after
/// `step`. Holdings are valued at `valuation_price`, trades execute at
/// `trade_price`. Negative results are sales.
pub(super) fn rebalance_shares(
    owned: i64,
    valuation_price: f64,
    trade_price: f64,
    step: usize,
    target_increase: f64,
) -> Option<i64> {
    let current_value = owned as f64 * valuation_price;
    let expected_value = (step + 1) as f64 * target_increase;
    let shares = ((expected_value - current_value) / trade_price).round();
    shares.is_finite().then_some(shares as i64)
}

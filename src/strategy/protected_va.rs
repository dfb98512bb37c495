//! Value averaging with a yearly protective put
//!
//! Once per calendar year the strategy buys at-the-money puts covering the
//! shares owned. Until the next purchase, holdings are valued no lower than the
//! last strike. This floor ignores the option's time value and delta; it is an
//! estimate of the protected downside, not exercise accounting.

use super::va::rebalance_shares;
use super::{StepLedger, StepPlan, Strategy, StrategyKind, StrategyOutcome};
use crate::model::{BlackScholes, OptionKind, OptionParams, OptionPricer};
use crate::series::PriceSeries;
use crate::telemetry;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Protective put parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionParams {
    /// Annualized implied volatility used to price the puts
    pub implied_volatility: f64,
    /// Annualized risk-free rate
    pub risk_free_rate: f64,
    /// Annualized dividend yield of the underlying
    pub dividend_yield: f64,
    /// Shares covered by one contract
    pub contract_size: u32,
    /// Time to expiry of each put, in years
    pub years_to_expiry: f64,
}

impl Default for ProtectionParams {
    fn default() -> Self {
        Self {
            implied_volatility: 0.30,
            risk_free_rate: 0.024,
            dividend_yield: 0.0,
            contract_size: 100,
            years_to_expiry: 1.0,
        }
    }
}

impl ProtectionParams {
    /// Contracts needed to cover `shares`, at least one
    pub fn contracts_for(&self, shares: i64) -> i64 {
        let size = i64::from(self.contract_size.max(1));
        if shares > size {
            (shares as f64 / size as f64).round() as i64
        } else {
            1
        }
    }
}

/// Last protective put bought
#[derive(Debug, Clone, Copy)]
struct Protection {
    year: i32,
    strike: f64,
}

/// Value averaging that buys protective puts every calendar year
pub struct ProtectedValueAveraging<P = BlackScholes> {
    pricer: P,
    params: ProtectionParams,
}

impl ProtectedValueAveraging<BlackScholes> {
    /// Create with the Black-Scholes pricer
    pub fn new(params: ProtectionParams) -> Self {
        Self::with_pricer(BlackScholes::new(), params)
    }
}

impl<P: OptionPricer> ProtectedValueAveraging<P> {
    /// Create with a custom option pricer
    pub fn with_pricer(pricer: P, params: ProtectionParams) -> Self {
        Self { pricer, params }
    }

    /// Cost of a single contract struck at the current price
    fn contract_cost(&self, price: f64) -> f64 {
        let premium = self.pricer.price(
            OptionKind::Put,
            &OptionParams {
                spot: price,
                strike: price,
                years_to_expiry: self.params.years_to_expiry,
                volatility: self.params.implied_volatility,
                risk_free_rate: self.params.risk_free_rate,
                dividend_yield: self.params.dividend_yield,
            },
        );
        premium * f64::from(self.params.contract_size)
    }
}

impl<P: OptionPricer> Strategy for ProtectedValueAveraging<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ProtectedValueAveraging
    }

    fn simulate(&self, series: &PriceSeries, plan: &StepPlan) -> StrategyOutcome {
        let mut ledger = StepLedger::new(self.kind());
        let mut protection: Option<Protection> = None;
        let mut premium_paid = 0.0;
        let mut purchases = 0usize;

        for step in 0..plan.steps {
            let now = plan.step_time(step);
            let price = match series.price_at(now, plan.tolerance()) {
                Ok(price) => price,
                Err(e) => {
                    ledger.skip(step, &e);
                    continue;
                }
            };

            let valuation_price = match protection {
                Some(p) => price.max(p.strike),
                None => price,
            };

            let shares = match rebalance_shares(
                ledger.shares(),
                valuation_price,
                price,
                step,
                plan.amount_per_step,
            ) {
                Some(shares) => shares,
                None => {
                    ledger.skip_unaffordable(step, price);
                    continue;
                }
            };

            ledger.trade(shares);
            let spend = shares as f64 * price;
            let holdings_value = ledger.shares() as f64 * price;
            let mut spend = plan.fees.apply(step, spend, holdings_value);

            if protection.map_or(true, |p| p.year != now.year()) {
                let contracts = self.params.contracts_for(ledger.shares());
                let cost = self.contract_cost(price) * contracts as f64;
                tracing::debug!(
                    step,
                    year = now.year(),
                    strike = price,
                    contracts,
                    cost,
                    "Bought protective puts"
                );
                telemetry::record_option_purchase();
                protection = Some(Protection {
                    year: now.year(),
                    strike: price,
                });
                premium_paid += cost;
                purchases += 1;
                spend += cost;
            }

            ledger.record_spend(spend);
        }

        tracing::debug!(purchases, premium_paid, "Protected value averaging finished");
        ledger.finish()
    }
}

//! Periodic investment strategies
//!
//! Each strategy replays a fixed number of equally-spaced investment steps
//! against a [`PriceSeries`], accumulating whole shares and money spent under
//! a [`FeeSchedule`]:
//! - Dollar-cost averaging: invest a fixed amount every step
//! - Value averaging: trade towards a linearly growing portfolio value
//! - Protected value averaging: value averaging plus a yearly protective put

mod dca;
mod ledger;
mod protected_va;
mod va;

pub use dca::DollarCostAveraging;
pub use ledger::StepLedger;
pub use protected_va::{ProtectedValueAveraging, ProtectionParams};
pub use va::ValueAveraging;

use crate::series::PriceSeries;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Dollar-cost averaging
    Dca,
    /// Value averaging
    ValueAveraging,
    /// Value averaging with a yearly protective put
    ProtectedValueAveraging,
}

impl StrategyKind {
    /// Stable identifier used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Dca => "dca",
            StrategyKind::ValueAveraging => "value_averaging",
            StrategyKind::ProtectedValueAveraging => "protected_value_averaging",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyKind::Dca => "DCA",
            StrategyKind::ValueAveraging => "VA",
            StrategyKind::ProtectedValueAveraging => "VA+PUT",
        };
        f.write_str(label)
    }
}

/// Transaction and holding fees, all as fractions (0.01 = 1%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fixed amount charged on every step
    pub fixed: f64,
    /// Fraction of the money transacted in a step
    pub percent: f64,
    /// Fraction of the holdings value charged every step after the first
    pub periodic_value: f64,
}

impl FeeSchedule {
    /// Add fees to the money spent in `step`.
    ///
    /// `holdings_value` is the value of all shares owned after this step's
    /// trade. No value fee is charged on the first step.
    pub fn apply(&self, step: usize, spend: f64, holdings_value: f64) -> f64 {
        let transaction = self.fixed + self.percent * spend;
        if step > 0 {
            spend + transaction + holdings_value * self.periodic_value
        } else {
            spend + transaction
        }
    }
}

/// Schedule of one simulation run
#[derive(Debug, Clone, Copy)]
pub struct StepPlan {
    /// Time of the first step
    pub start: DateTime<Utc>,
    /// Time between steps
    pub interval: Duration,
    /// Number of steps
    pub steps: usize,
    /// Amount invested per step (DCA) or target value increase per step (VA)
    pub amount_per_step: f64,
    /// Fees applied on every step
    pub fees: FeeSchedule,
}

impl StepPlan {
    /// Time of the given step
    pub fn step_time(&self, step: usize) -> DateTime<Utc> {
        let step = i64::try_from(step).unwrap_or(i64::MAX);
        let offset_ms = self.interval.num_milliseconds().saturating_mul(step);
        self.start + Duration::milliseconds(offset_ms)
    }

    /// Maximum distance between a step time and the price sample used for it
    pub fn tolerance(&self) -> Duration {
        self.interval / 2
    }
}

/// Outcome of a single strategy run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    /// Whole shares owned at the end
    pub shares_owned: i64,
    /// Money spent including fees (sales reduce it)
    pub money_spent: f64,
    /// Lowest fee-inclusive spend of a single step
    pub lowest_step_spend: Option<f64>,
    /// Highest fee-inclusive spend of a single step
    pub highest_step_spend: Option<f64>,
    /// Steps skipped because no usable price was found
    pub skipped_steps: usize,
}

/// A periodic investment strategy
pub trait Strategy: Send + Sync {
    /// Strategy identifier
    fn kind(&self) -> StrategyKind;

    /// Replay the plan against the series
    fn simulate(&self, series: &PriceSeries, plan: &StepPlan) -> StrategyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fee_first_step_has_no_value_fee() {
        let fees = FeeSchedule {
            fixed: 1.0,
            percent: 0.01,
            periodic_value: 0.5,
        };
        assert_eq!(fees.apply(0, 100.0, 1000.0), 102.0);
        assert_eq!(fees.apply(1, 100.0, 1000.0), 602.0);
    }

    #[test]
    fn test_fee_on_sale_is_signed() {
        let fees = FeeSchedule {
            fixed: 0.0,
            percent: 0.1,
            periodic_value: 0.0,
        };
        assert_eq!(fees.apply(0, -100.0, 0.0), -110.0);
    }

    #[test]
    fn test_step_plan_times() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let plan = StepPlan {
            start,
            interval: Duration::days(30),
            steps: 3,
            amount_per_step: 100.0,
            fees: FeeSchedule::default(),
        };
        assert_eq!(plan.step_time(0), start);
        assert_eq!(plan.step_time(2), start + Duration::days(60));
        assert_eq!(plan.tolerance(), Duration::days(15));
    }

    #[test]
    fn test_step_time_beyond_i32_steps() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let plan = StepPlan {
            start,
            interval: Duration::seconds(1),
            steps: 0,
            amount_per_step: 0.0,
            fees: FeeSchedule::default(),
        };
        let step = 3_000_000_000usize;
        assert_eq!(plan.step_time(step), start + Duration::seconds(3_000_000_000));
    }

    #[test]
    fn test_strategy_kind_labels() {
        assert_eq!(StrategyKind::Dca.to_string(), "DCA");
        assert_eq!(StrategyKind::ValueAveraging.as_str(), "value_averaging");
        assert!(StrategyKind::Dca < StrategyKind::ProtectedValueAveraging);
    }
}

//! Black-Scholes option pricing
//!
//! Generalised for a continuous dividend yield q:
//! d1 = (ln(S/K) + (r - q + 0.5*sigma^2)*T) / (sigma*sqrt(T)), d2 = d1 - sigma*sqrt(T)
//! call = S*e^(-qT)*N(d1) - K*e^(-rT)*N(d2)
//! put  = K*e^(-rT)*N(-d2) - S*e^(-qT)*N(-d1)

use super::{OptionKind, OptionParams, OptionPricer};

/// European option pricer using the Black-Scholes formula
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes;

impl BlackScholes {
    /// Create a new Black-Scholes pricer
    pub fn new() -> Self {
        Self
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionPricer for BlackScholes {
    fn price(&self, kind: OptionKind, params: &OptionParams) -> f64 {
        let s = params.spot;
        let k = params.strike;
        let t = params.years_to_expiry;
        let sigma = params.volatility;
        let r = params.risk_free_rate;
        let q = params.dividend_yield;

        if s <= 0.0 || k <= 0.0 {
            return 0.0;
        }

        let discounted_spot = s * (-q * t).exp();
        let discounted_strike = k * (-r * t).exp();

        if t <= 0.0 || sigma <= 0.0 {
            // At expiry or zero vol: intrinsic value of the forward
            return match kind {
                OptionKind::Call => (discounted_spot - discounted_strike).max(0.0),
                OptionKind::Put => (discounted_strike - discounted_spot).max(0.0),
            };
        }

        let vol_sqrt_t = sigma * t.sqrt();
        let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;

        match kind {
            OptionKind::Call => discounted_spot * normal_cdf(d1) - discounted_strike * normal_cdf(d2),
            OptionKind::Put => discounted_strike * normal_cdf(-d2) - discounted_spot * normal_cdf(-d1),
        }
    }
}

/// Standard normal CDF approximation (Abramowitz and Stegun)
fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

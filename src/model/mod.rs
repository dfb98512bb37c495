//! Option pricing model module
//!
//! Prices the protective puts bought by protected value averaging

mod black_scholes;

pub use black_scholes::BlackScholes;

use serde::{Deserialize, Serialize};

/// Option contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

/// Parameters for option pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionParams {
    /// Current price of the underlying
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Time to expiry in years
    pub years_to_expiry: f64,
    /// Annualized implied volatility
    pub volatility: f64,
    /// Annualized risk-free interest rate
    pub risk_free_rate: f64,
    /// Annualized continuous dividend yield
    pub dividend_yield: f64,
}

/// Trait for option pricing implementations
pub trait OptionPricer: Send + Sync {
    /// Premium of a single option on one unit of the underlying
    fn price(&self, kind: OptionKind, params: &OptionParams) -> f64;
}

//! Configuration types for avg-backtest

use crate::backtest::{month_interval, SweepSettings, DEFAULT_INTERVAL_MONTHS};
use crate::strategy::ProtectionParams;
use crate::telemetry::LogFormat;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fees: FeeConfig,
    pub investment: InvestmentConfig,
    pub sweep: SweepConfig,
    pub protection: ProtectionConfig,
    pub telemetry: TelemetryConfig,
}

/// Fee configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Fixed fee per transaction (currency)
    pub fixed: Decimal,
    /// Fee per transaction (percent of the amount transacted)
    pub percent: Decimal,
    /// Fee per year (percent of the holdings value)
    pub timed: Decimal,
}

/// Investment range configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InvestmentConfig {
    /// Amount to invest (DCA) or to own at the end (VA)
    pub amount: Decimal,
    /// Only use the most recent N years of data (0 = all)
    pub recent_years: u32,
    /// Sliding-window horizon in years (0 = single fixed range)
    pub horizon_years: u32,
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        Self {
            amount: Decimal::ONE_HUNDRED,
            recent_years: 0,
            horizon_years: 0,
        }
    }
}

/// Sweep configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Candidate intervals between steps, in 30-day months
    pub interval_months: Vec<u32>,
    /// Tolerance of the closing price lookup
    pub valuation_tolerance_hours: u32,
    /// Distance between consecutive sliding windows
    pub slide_step_days: u32,
    /// Run sliding windows in parallel
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_months: DEFAULT_INTERVAL_MONTHS.to_vec(),
            valuation_tolerance_hours: 24,
            slide_step_days: 7,
            parallel: true,
        }
    }
}

/// Protective put configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Also run protected value averaging
    pub enabled: bool,
    #[serde(flatten)]
    pub params: ProtectionParams,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Decimal to float for the simulation core
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Sweep settings with percentages converted to fractions
    pub fn sweep_settings(&self) -> SweepSettings {
        let hundred = Decimal::ONE_HUNDRED;
        SweepSettings {
            total_to_invest: decimal_to_f64(self.investment.amount),
            fixed_fee: decimal_to_f64(self.fees.fixed),
            percent_fee: decimal_to_f64(self.fees.percent / hundred),
            yearly_value_fee: decimal_to_f64(self.fees.timed / hundred),
            intervals: self
                .sweep
                .interval_months
                .iter()
                .map(|&m| month_interval(m))
                .collect(),
            valuation_tolerance: Duration::hours(i64::from(self.sweep.valuation_tolerance_hours)),
            slide_step: Duration::days(i64::from(self.sweep.slide_step_days)),
            parallel: self.sweep.parallel,
        }
    }
}

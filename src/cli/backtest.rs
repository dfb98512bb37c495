//! Backtest command implementation

use crate::backtest::{horizon_years, BacktestDriver, DateRange, RangeReport, SlidingReport};
use crate::config::Config;
use crate::data::load_prices;
use anyhow::Context;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON document
    Json,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Price file: Yahoo CSV export or Parquet price file
    pub data: PathBuf,

    /// Fixed fee per transaction (currency)
    #[arg(short = 'f', long)]
    pub fixed_fee: Option<Decimal>,

    /// Fee per transaction (percent)
    #[arg(short = 'p', long)]
    pub percent_fee: Option<Decimal>,

    /// Fee per year (percent of holdings value)
    #[arg(short = 't', long)]
    pub timed_fee: Option<Decimal>,

    /// Amount (in currency) to invest or own at the end
    #[arg(short = 'i', long)]
    pub to_invest: Option<Decimal>,

    /// Start this many years before the most recent data point
    #[arg(short = 'r', long)]
    pub recent_years: Option<u32>,

    /// Investment horizon in years; enables the sliding-window sweep
    #[arg(short = 'y', long)]
    pub horizon_years: Option<u32>,

    /// Also simulate value averaging with yearly protective puts
    #[arg(long)]
    pub protected: bool,

    /// Run sliding windows on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Report of either sweep mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BacktestReport {
    Range(RangeReport),
    Sliding(SlidingReport),
}

impl BacktestReport {
    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(match self {
                BacktestReport::Range(report) => report.format_table(),
                BacktestReport::Sliding(report) => report.format_table(),
            }),
        }
    }
}

impl BacktestArgs {
    /// Configuration with command-line overrides applied
    pub fn effective_config(&self, base: &Config) -> Config {
        let mut config = base.clone();
        if let Some(fee) = self.fixed_fee {
            config.fees.fixed = fee;
        }
        if let Some(fee) = self.percent_fee {
            config.fees.percent = fee;
        }
        if let Some(fee) = self.timed_fee {
            config.fees.timed = fee;
        }
        if let Some(amount) = self.to_invest {
            config.investment.amount = amount;
        }
        if let Some(years) = self.recent_years {
            config.investment.recent_years = years;
        }
        if let Some(years) = self.horizon_years {
            config.investment.horizon_years = years;
        }
        if self.protected {
            config.protection.enabled = true;
        }
        if self.sequential {
            config.sweep.parallel = false;
        }
        config
    }

    /// Load the data and run the sweep selected by the configuration
    pub fn run(&self, config: &Config) -> anyhow::Result<BacktestReport> {
        let series = load_prices(&self.data)
            .with_context(|| format!("Failed to load prices from {}", self.data.display()))?;
        let range = DateRange::of_series(&series, config.investment.recent_years)
            .with_context(|| format!("No usable prices in {}", self.data.display()))?;

        tracing::info!(
            points = series.len(),
            oldest = ?series.oldest(),
            newest = ?series.newest(),
            start = %range.start,
            end = %range.end,
            "Loaded price series"
        );

        let mut driver = BacktestDriver::new(config.sweep_settings());
        if config.protection.enabled {
            driver = driver.with_protection(config.protection.params);
        }

        let report = match config.investment.horizon_years {
            0 => BacktestReport::Range(driver.sweep_range(&series, range)?),
            years => BacktestReport::Sliding(driver.sweep_sliding(
                &series,
                range,
                horizon_years(years),
            )?),
        };

        Ok(report)
    }

    pub async fn execute(self, config: &Config) -> anyhow::Result<()> {
        let config = self.effective_config(config);
        tracing::info!(
            data = ?self.data,
            fixed_fee = %config.fees.fixed,
            percent_fee = %config.fees.percent,
            timed_fee = %config.fees.timed,
            amount = %config.investment.amount,
            "Running backtest"
        );

        let format = self.format;
        let report = tokio::task::spawn_blocking(move || self.run(&config)).await??;
        println!("{}", report.render(format)?);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(data: PathBuf) -> BacktestArgs {
        BacktestArgs {
            data,
            fixed_fee: None,
            percent_fee: None,
            timed_fee: None,
            to_invest: None,
            recent_years: None,
            horizon_years: None,
            protected: false,
            sequential: true,
            format: OutputFormat::Table,
        }
    }

    /// Two years of weekday prices rising one cent per day
    fn csv_file() -> NamedTempFile {
        use chrono::{Datelike, Duration, NaiveDate, Weekday};

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        for d in 0..730 {
            let date = start + Duration::days(d);
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let price = 100.0 + d as f64 * 0.01;
            writeln!(file, "{date},{price},{price},{price},{price},{price},1000").unwrap();
        }
        file
    }

    #[test]
    fn test_effective_config_overrides() {
        let mut a = args(PathBuf::from("x.csv"));
        a.fixed_fee = Some(dec!(2));
        a.to_invest = Some(dec!(5000));
        a.horizon_years = Some(3);
        a.protected = true;

        let config = a.effective_config(&Config::default());
        assert_eq!(config.fees.fixed, dec!(2));
        assert_eq!(config.fees.percent, dec!(0));
        assert_eq!(config.investment.amount, dec!(5000));
        assert_eq!(config.investment.horizon_years, 3);
        assert!(config.protection.enabled);
        assert!(!config.sweep.parallel);
    }

    #[test]
    fn test_run_fixed_range() {
        let file = csv_file();
        let a = args(file.path().to_path_buf());
        let config = a.effective_config(&Config::default());

        let report = a.run(&config).unwrap();
        let BacktestReport::Range(report) = report else {
            panic!("expected fixed-range report");
        };
        // Span of 729 days: every interval up to 24 months fits, 48 does not
        assert_eq!(report.results.len(), 8 * 2);
        assert!(report.format_table().contains("INTERVAL 1m"));
    }

    #[test]
    fn test_run_sliding_with_protection() {
        let file = csv_file();
        let mut a = args(file.path().to_path_buf());
        a.horizon_years = Some(1);
        a.protected = true;
        a.format = OutputFormat::Json;
        let config = a.effective_config(&Config::default());

        let report = a.run(&config).unwrap();
        let json = report.render(a.format).unwrap();
        assert!(json.contains("\"mode\": \"sliding\""));
        let BacktestReport::Sliding(report) = report else {
            panic!("expected sliding report");
        };
        assert!(report.windows > 50);
        assert!(report.aggregates.iter().all(|agg| agg.samples > 0));
    }

    #[test]
    fn test_run_infeasible_horizon() {
        let file = csv_file();
        let mut a = args(file.path().to_path_buf());
        a.horizon_years = Some(5);
        let config = a.effective_config(&Config::default());

        let err = a.run(&config).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
    }

    #[test]
    fn test_run_missing_file() {
        let a = args(PathBuf::from("/nonexistent/prices.csv"));
        let err = a.run(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to load prices"));
    }

    #[tokio::test]
    async fn test_execute_prints_report() {
        let file = csv_file();
        let a = args(file.path().to_path_buf());
        a.execute(&Config::default()).await.unwrap();
    }
}

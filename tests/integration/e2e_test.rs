//! End-to-end integration tests

use avg_backtest::backtest::{month_interval, BacktestDriver, DateRange};
use avg_backtest::cli::{BacktestArgs, BacktestReport, Cli, Commands, OutputFormat};
use avg_backtest::config::Config;
use avg_backtest::data::{load_prices, ParquetWriter};
use avg_backtest::strategy::StrategyKind;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Write a daily Yahoo export with the given adjusted close per day
fn write_csv(path: &Path, days: i64, price: impl Fn(i64) -> f64) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    for d in 0..days {
        let date = start + Duration::days(d);
        let p = price(d);
        writeln!(file, "{date},{p},{p},{p},{p},{p},100").unwrap();
    }
}

fn backtest_args(argv: &[&str]) -> BacktestArgs {
    let cli = Cli::parse_from(argv);
    match cli.command {
        Commands::Backtest(args) => args,
        other => panic!("expected backtest command, got {other:?}"),
    }
}

#[test]
fn test_config_example_exists() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.sweep.slide_step_days, 7);
    assert!(!config.protection.enabled);
}

#[test]
fn test_constant_price_fixed_range() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("flat.csv");
    write_csv(&csv, 365, |_| 100.0);

    let args = backtest_args(&[
        "avg-backtest",
        "backtest",
        "-i",
        "1200",
        "--sequential",
        csv.to_str().unwrap(),
    ]);
    let mut config = args.effective_config(&Config::default());
    config.sweep.interval_months = vec![1];

    let BacktestReport::Range(report) = args.run(&config).unwrap() else {
        panic!("expected fixed-range report");
    };
    assert_eq!(report.results.len(), 2);

    let dca = &report.results[0];
    assert_eq!(dca.strategy, StrategyKind::Dca);
    assert_eq!(dca.steps, 12);
    assert_eq!(dca.shares_owned, 12);
    assert!((dca.money_spent - 1200.0).abs() < 1e-9);
    assert!((dca.final_value - 1200.0).abs() < 1e-9);
}

#[test]
fn test_sliding_report_json() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("wave.csv");
    write_csv(&csv, 365 * 3, |d| 100.0 + 20.0 * ((d as f64) / 60.0).sin());

    let args = backtest_args(&[
        "avg-backtest",
        "backtest",
        "-y",
        "2",
        "-i",
        "10000",
        "-f",
        "1",
        "--protected",
        "--format",
        "json",
        csv.to_str().unwrap(),
    ]);
    assert_eq!(args.format, OutputFormat::Json);
    let config = args.effective_config(&Config::default());

    let report = args.run(&config).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.render(args.format).unwrap()).unwrap();

    assert_eq!(json["mode"], "sliding");
    assert_eq!(json["horizon_days"], 730);
    assert_eq!(json["skipped_windows"], 0);
    let aggregates = json["aggregates"].as_array().unwrap();
    // Intervals up to 24 months fit in two years; three strategies each
    assert_eq!(aggregates.len(), 8 * 3);
    assert!(aggregates
        .iter()
        .any(|a| a["median"]["strategy"] == "protected_value_averaging"));
}

#[test]
fn test_parquet_input_matches_csv() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("prices.csv");
    let parquet = dir.path().join("prices.parquet");
    write_csv(&csv, 500, |d| 50.0 + (d % 17) as f64);

    let from_csv = load_prices(&csv).unwrap();
    ParquetWriter::new(&parquet)
        .write_price_points(from_csv.points())
        .unwrap();
    let from_parquet = load_prices(&parquet).unwrap();
    assert_eq!(from_csv.points(), from_parquet.points());

    let settings = Config::default().sweep_settings();
    let driver = BacktestDriver::new(settings);
    let range = DateRange::of_series(&from_csv, 0).unwrap();
    let a = driver.run_range(&from_csv, &range).unwrap();
    let b = driver.run_range(&from_parquet, &range).unwrap();
    assert_eq!(a, b);
    assert!(a.iter().any(|r| r.interval == month_interval(12)));
}

#[test]
fn test_recent_years_limits_range() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("long.csv");
    write_csv(&csv, 365 * 6, |d| 10.0 + d as f64 * 0.01);

    let args = backtest_args(&["avg-backtest", "backtest", "-r", "2", csv.to_str().unwrap()]);
    let config = args.effective_config(&Config::default());

    let BacktestReport::Range(report) = args.run(&config).unwrap() else {
        panic!("expected fixed-range report");
    };
    assert!(report.range.span() <= Duration::days(731));
    // The 48 month interval no longer fits
    assert!(report
        .results
        .iter()
        .all(|r| r.interval < month_interval(48)));
}

//! CLI interface for avg-backtest
//!
//! Provides subcommands for:
//! - `backtest`: Sweep DCA and VA over a price file
//! - `convert`: Convert a Yahoo CSV export to a Parquet price file
//! - `config`: Show the effective configuration

mod backtest;
mod convert;

pub use backtest::{BacktestArgs, BacktestReport, OutputFormat};
pub use convert::ConvertArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "avg-backtest")]
#[command(
    about = "Computes the best strategy for cost/value averaging using historical price data"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Backtest DCA and VA over every candidate interval
    Backtest(BacktestArgs),
    /// Convert a Yahoo CSV export to a Parquet price file
    Convert(ConvertArgs),
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backtest_defaults() {
        let cli = Cli::parse_from(["avg-backtest", "backtest", "spy.csv"]);
        assert_eq!(cli.config, "config.toml");
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.data.to_str(), Some("spy.csv"));
                assert!(args.fixed_fee.is_none());
                assert!(args.horizon_years.is_none());
                assert!(!args.protected);
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_backtest_options() {
        let cli = Cli::parse_from([
            "avg-backtest",
            "-c",
            "custom.toml",
            "backtest",
            "-f",
            "1.5",
            "-p",
            "0.2",
            "-t",
            "1",
            "-i",
            "10000",
            "-r",
            "10",
            "-y",
            "5",
            "--protected",
            "--format",
            "json",
            "spy.csv",
        ]);
        assert_eq!(cli.config, "custom.toml");
        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest command");
        };
        assert_eq!(args.fixed_fee, Some(rust_decimal_macros::dec!(1.5)));
        assert_eq!(args.to_invest, Some(rust_decimal_macros::dec!(10000)));
        assert_eq!(args.recent_years, Some(10));
        assert_eq!(args.horizon_years, Some(5));
        assert!(args.protected);
        assert_eq!(args.format, OutputFormat::Json);
    }
}

use avg_backtest::cli::{Cli, Commands};
use avg_backtest::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    avg_backtest::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Backtest(args) => {
            tracing::info!("Starting backtest");
            args.execute(&config).await?;
        }
        Commands::Convert(args) => {
            tracing::info!("Starting conversion");
            args.execute().await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Fees: fixed={}, percent={}%, timed={}%/year",
                config.fees.fixed, config.fees.percent, config.fees.timed
            );
            println!(
                "  Investment: amount={}, recent_years={}, horizon_years={}",
                config.investment.amount,
                config.investment.recent_years,
                config.investment.horizon_years
            );
            println!(
                "  Sweep: months={:?}, tolerance={}h, slide={}d, parallel={}",
                config.sweep.interval_months,
                config.sweep.valuation_tolerance_hours,
                config.sweep.slide_step_days,
                config.sweep.parallel
            );
            println!(
                "  Protection: enabled={}, iv={}, rate={}, contract={}",
                config.protection.enabled,
                config.protection.params.implied_volatility,
                config.protection.params.risk_free_rate,
                config.protection.params.contract_size
            );
            println!(
                "  Telemetry: level={}, format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}

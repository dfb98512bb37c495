//! avg-backtest: Backtester for dollar-cost and value averaging
//!
//! This library provides the core components for:
//! - Historical price series with tolerant time lookups
//! - Loading Yahoo CSV exports and Parquet price files
//! - Dollar-cost averaging, value averaging and protected value averaging
//! - Black-Scholes option pricing for protective puts
//! - Fixed-range and sliding-window interval sweeps
//! - Report formatting and structured logging

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod model;
pub mod series;
pub mod strategy;
pub mod telemetry;

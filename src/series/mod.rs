//! Historical price series
//!
//! Irregularly-sampled price history with a tolerant "price at or before"
//! lookup used by every simulator.

mod price_series;
mod types;

pub use price_series::PriceSeries;
pub use types::{PricePoint, SeriesError};

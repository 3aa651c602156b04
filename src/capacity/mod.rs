//! Capacity Oracle Module
//!
//! This module decides the maximum tradeable quantity per trade kind at the
//! current point in time:
//! - Generation-backed trades are capped by the live solar forecast
//! - Storage-backed trades are capped by a fixed fraction of battery capacity
//!
//! The forecast lookup is fail-open: a service failure substitutes a fixed
//! fallback instead of blocking intake.

mod forecast;
mod oracle;

pub use forecast::{Forecast, ForecastOutcome, ForecastProvider, OpenMeteoClient};
pub use oracle::CapacityOracle;

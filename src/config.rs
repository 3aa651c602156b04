//! Configuration Module
//!
//! This module defines all configuration structures for the oracle.
//! Configuration is loaded from TOML files and parsed using serde.

use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Contains all configuration sections for the oracle.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [batch]
/// size_threshold = 5
///
/// [market]
/// unit_price = 80
///
/// [api]
/// host = "127.0.0.1"
/// port = 8000
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub batch: BatchConfig,
    pub market: MarketConfig,
    pub forecast: ForecastConfig,
    pub chain: ChainConfig,
}

/// Batch flush configuration
///
/// # Fields
/// - `size_threshold`: queue length at which a flush is scheduled
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub size_threshold: usize,
}

/// Marketplace constants
///
/// # Fields
/// - `unit_price`: fixed per-unit price stamped onto every accepted trade
/// - `battery_capacity`: nameplate capacity backing storage trades
/// - `battery_efficiency`: charge/discharge efficiency factor; the storage
///   ceiling is `battery_capacity * battery_efficiency`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    pub unit_price: u64,
    pub battery_capacity: u64,
    pub battery_efficiency: f64,
}

/// Forecast service configuration
///
/// # Fields
/// - `url`: current-conditions endpoint (cloud cover + is_day)
/// - `timeout_ms`: bound on each forecast request
/// - `solar_max_output`: clear-sky generation ceiling the forecast scales
/// - `fallback_label` / `fallback_ceiling`: substituted when the service
///   fails or times out
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub url: String,
    pub timeout_ms: u64,
    pub solar_max_output: u64,
    pub fallback_label: String,
    pub fallback_ceiling: u64,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Settlement chain configuration
///
/// # Fields
/// - `rpc_url`: JSON-RPC endpoint of the settlement chain
/// - `chain_id`: chain id signed into every settlement transaction
/// - `contract_address`: settlement contract receiving batch commitments
/// - `private_key`: hex-encoded signer key (single trusted oracle key)
/// - `gas_limit` / `gas_price_gwei`: fixed allowance for every settlement tx
/// - `timeout_ms`: bound on each chain client call
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub private_key: String,
    pub gas_limit: u64,
    pub gas_price_gwei: u64,
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        // Read the file contents as a string
        let content = fs::read_to_string(path)?;

        // Parse the TOML into our Config structure
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }
}

use crate::capacity::{ForecastOutcome, ForecastProvider};
use crate::config::MarketConfig;
use crate::TradeKind;
use std::sync::Arc;

/// Decides the permitted maximum quantity per trade kind.
///
/// Generation-backed trades are capped by the live forecast; storage-backed
/// trades by `battery_capacity * battery_efficiency`, independent of the
/// forecast call.
pub struct CapacityOracle {
    provider: Arc<dyn ForecastProvider>,
    battery_capacity: u64,
    battery_efficiency: f64,
}

impl CapacityOracle {
    pub fn new(provider: Arc<dyn ForecastProvider>, market: &MarketConfig) -> Self {
        Self {
            provider,
            battery_capacity: market.battery_capacity,
            battery_efficiency: market.battery_efficiency,
        }
    }

    /// Take one forecast observation. Fail-open: never errors.
    ///
    /// Intake calls this once per submission; the observation supplies both
    /// the audit label and, for solar trades, the ceiling.
    pub async fn observe(&self) -> ForecastOutcome {
        self.provider.current().await
    }

    /// Permitted maximum quantity for `kind` under the given observation.
    pub fn ceiling(&self, kind: TradeKind, observation: &ForecastOutcome) -> u64 {
        match kind {
            TradeKind::Solar => observation.forecast().solar_ceiling,
            TradeKind::Storage => {
                (self.battery_capacity as f64 * self.battery_efficiency) as u64
            }
        }
    }
}

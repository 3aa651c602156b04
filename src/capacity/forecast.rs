//! Weather forecast collaborator.
//!
//! The oracle consumes the forecast service through a narrow contract: no
//! arguments (implicitly "now"), returns a sky label and a generation
//! ceiling, and never raises. Failures are folded into a fixed fallback
//! tuple so the fail-open policy is visible in the return type rather than
//! hidden behind a catch-all.

use crate::config::ForecastConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// A point-in-time generation forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forecast {
    /// Human-readable sky label ("Sunny", "Cloudy", "Stormy", "Night").
    pub label: String,
    /// Maximum solar generation permitted under these conditions.
    pub solar_ceiling: u64,
}

/// Result of one forecast observation.
///
/// `Fallback` marks an observation substituted after a service failure or
/// timeout; callers treat both arms the same but the distinction is logged
/// and visible at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastOutcome {
    Live(Forecast),
    Fallback(Forecast),
}

impl ForecastOutcome {
    pub fn forecast(&self) -> &Forecast {
        match self {
            ForecastOutcome::Live(f) | ForecastOutcome::Fallback(f) => f,
        }
    }
}

/// Source of forecast observations.
///
/// The production implementation calls the external weather service; tests
/// substitute a fixed provider.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Observe current conditions. Must not fail: implementations recover
    /// internally and report a `Fallback` outcome instead.
    async fn current(&self) -> ForecastOutcome;
}

/// Subset of the Open-Meteo current-conditions payload we read.
#[derive(Debug, Deserialize)]
struct MeteoResponse {
    current: MeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct MeteoCurrent {
    cloud_cover: u64,
    is_day: u64,
}

/// Forecast client backed by the Open-Meteo current-conditions endpoint.
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: ForecastConfig,
}

impl OpenMeteoClient {
    pub fn new(config: ForecastConfig) -> Self {
        // Per-request timeout lives on the client so every call is bounded.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("reqwest client");
        Self { http, config }
    }

    async fn fetch(&self) -> Result<Forecast, reqwest::Error> {
        let response = self
            .http
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?;
        let body: MeteoResponse = response.json().await?;
        Ok(self.interpret(&body.current))
    }

    /// Map raw conditions to a label and generation ceiling.
    fn interpret(&self, current: &MeteoCurrent) -> Forecast {
        if current.is_day == 0 {
            return Forecast {
                label: "Night".to_string(),
                solar_ceiling: 0,
            };
        }

        let cloud_cover = current.cloud_cover.min(100);
        let efficiency = (100 - cloud_cover) as f64 / 100.0;
        let solar_ceiling = (self.config.solar_max_output as f64 * efficiency) as u64;

        let label = if cloud_cover < 20 {
            "Sunny"
        } else if cloud_cover < 70 {
            "Cloudy"
        } else {
            "Stormy"
        };

        Forecast {
            label: label.to_string(),
            solar_ceiling,
        }
    }

    fn fallback(&self) -> Forecast {
        Forecast {
            label: self.config.fallback_label.clone(),
            solar_ceiling: self.config.fallback_ceiling,
        }
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn current(&self) -> ForecastOutcome {
        match self.fetch().await {
            Ok(forecast) => ForecastOutcome::Live(forecast),
            Err(e) => {
                warn!("Forecast lookup failed, using fallback: {}", e);
                ForecastOutcome::Fallback(self.fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(solar_max_output: u64) -> OpenMeteoClient {
        OpenMeteoClient::new(ForecastConfig {
            url: "http://localhost:0/forecast".to_string(),
            timeout_ms: 100,
            solar_max_output,
            fallback_label: "Sunny".to_string(),
            fallback_ceiling: 50,
        })
    }

    #[test]
    fn night_zeroes_the_ceiling() {
        let forecast = client(50).interpret(&MeteoCurrent {
            cloud_cover: 0,
            is_day: 0,
        });
        assert_eq!(forecast.label, "Night");
        assert_eq!(forecast.solar_ceiling, 0);
    }

    #[test]
    fn cloud_cover_scales_the_ceiling() {
        let c = client(50);

        let clear = c.interpret(&MeteoCurrent { cloud_cover: 10, is_day: 1 });
        assert_eq!(clear.label, "Sunny");
        assert_eq!(clear.solar_ceiling, 45);

        let overcast = c.interpret(&MeteoCurrent { cloud_cover: 40, is_day: 1 });
        assert_eq!(overcast.label, "Cloudy");
        assert_eq!(overcast.solar_ceiling, 30);

        let storm = c.interpret(&MeteoCurrent { cloud_cover: 90, is_day: 1 });
        assert_eq!(storm.label, "Stormy");
        assert_eq!(storm.solar_ceiling, 5);
    }

    #[tokio::test]
    async fn unreachable_service_yields_fallback() {
        // Port 0 is never routable, so the request fails fast.
        match client(50).current().await {
            ForecastOutcome::Fallback(f) => {
                assert_eq!(f.label, "Sunny");
                assert_eq!(f.solar_ceiling, 50);
            }
            ForecastOutcome::Live(_) => panic!("expected fallback outcome"),
        }
    }
}

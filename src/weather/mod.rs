//! Heat-wave prediction from a weather forecast.
//!
//! - `ForecastProvider`: source of 3-hour forecast buckets
//! - `OpenWeatherMapProvider`: the live REST source
//! - `SimulatedForecastProvider`: scripted per-city demo data
//! - `HeatWavePredictor`: threshold classification and advice

mod forecast;
mod openweathermap;
mod predictor;
mod simulated;

use std::sync::Arc;

use reqwest::Client;

use crate::core::config::settings::WeatherSettings;
use crate::core::config::WeatherSource;
use crate::core::http::RetryPolicy;

pub use forecast::{ForecastProvider, ForecastSample};
pub use openweathermap::OpenWeatherMapProvider;
pub use predictor::{
    AdviceLevel, HeatSeverity, HeatWaveDay, HeatWavePrediction, HeatWavePredictor,
    PredictionWindow, HEAT_WAVE_CELSIUS, SEVERE_HEAT_WAVE_CELSIUS, WINDOW_BUCKETS,
};
pub use simulated::SimulatedForecastProvider;

pub fn forecast_provider(
    settings: &WeatherSettings,
    client: Client,
    retry: RetryPolicy,
) -> Arc<dyn ForecastProvider> {
    tracing::info!("Forecast source: {}", settings.provider.as_str());
    match settings.provider {
        WeatherSource::OpenWeatherMap => {
            if settings.api_key.is_none() {
                tracing::warn!("weather.api_key is not set; heat-wave predictions will fail");
            }
            Arc::new(OpenWeatherMapProvider::new(
                settings.base_url.clone(),
                settings.api_key.clone(),
                settings.country.clone(),
                client,
                retry,
            ))
        }
        WeatherSource::Simulated => Arc::new(SimulatedForecastProvider::new()),
    }
}

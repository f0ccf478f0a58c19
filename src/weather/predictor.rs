//! Heat-wave classification over the next ~48 hours of forecast.
//!
//! Thresholds follow the IMD convention for the plains: 40 °C is a heat
//! wave, 45 °C a severe heat wave. Advice depends only on how many
//! buckets were flagged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::forecast::{ForecastProvider, ForecastSample};
use crate::core::errors::ApiError;

pub const HEAT_WAVE_CELSIUS: f64 = 40.0;
pub const SEVERE_HEAT_WAVE_CELSIUS: f64 = 45.0;

/// 8 three-hour buckets, i.e. the next two days.
pub const WINDOW_BUCKETS: usize = 8;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatSeverity {
    None,
    HeatWave,
    SevereHeatWave,
}

impl HeatSeverity {
    pub fn classify(temperature: f64) -> Self {
        if temperature >= SEVERE_HEAT_WAVE_CELSIUS {
            HeatSeverity::SevereHeatWave
        } else if temperature >= HEAT_WAVE_CELSIUS {
            HeatSeverity::HeatWave
        } else {
            HeatSeverity::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeatSeverity::None => "NONE",
            HeatSeverity::HeatWave => "HEAT WAVE",
            HeatSeverity::SevereHeatWave => "SEVERE HEAT WAVE",
        }
    }

    pub fn risk(&self) -> &'static str {
        match self {
            HeatSeverity::None => "LOW",
            HeatSeverity::HeatWave => "HIGH",
            HeatSeverity::SevereHeatWave => "EXTREME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceLevel {
    Reassurance,
    Moderate,
    Severe,
}

impl AdviceLevel {
    pub fn for_flagged_count(count: usize) -> Self {
        match count {
            0 => AdviceLevel::Reassurance,
            1 | 2 => AdviceLevel::Moderate,
            _ => AdviceLevel::Severe,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AdviceLevel::Reassurance => {
                "No heat wave predicted. Stay hydrated and avoid peak sun hours."
            }
            AdviceLevel::Moderate => {
                "Heat wave conditions expected. Stay indoors 12-3 PM, drink water frequently, wear light clothes."
            }
            AdviceLevel::Severe => {
                "SEVERE heat wave conditions! Avoid outdoor activities, stay in AC/cooled areas, drink ORS, watch for heat stroke symptoms."
            }
        }
    }
}

/// The first [`WINDOW_BUCKETS`] forecast samples, each with its severity.
#[derive(Debug, Clone)]
pub struct PredictionWindow {
    buckets: Vec<(ForecastSample, HeatSeverity)>,
}

impl PredictionWindow {
    pub fn from_forecast(samples: Vec<ForecastSample>) -> Self {
        let buckets = samples
            .into_iter()
            .take(WINDOW_BUCKETS)
            .map(|sample| {
                let severity = HeatSeverity::classify(sample.temperature);
                (sample, severity)
            })
            .collect();
        Self { buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn flagged(&self) -> impl Iterator<Item = &(ForecastSample, HeatSeverity)> {
        self.buckets
            .iter()
            .filter(|(_, severity)| *severity != HeatSeverity::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatWaveDay {
    pub date: String,
    pub temp: f64,
    pub severity: String,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatWavePrediction {
    pub city: String,
    pub prediction_time: String,
    pub heat_wave_days: Vec<HeatWaveDay>,
    pub warnings: Vec<String>,
    pub safety_advice: String,
}

impl HeatWavePrediction {
    pub fn from_window(city: &str, window: &PredictionWindow, now: DateTime<Utc>) -> Self {
        let mut heat_wave_days = Vec::new();
        let mut warnings = Vec::new();

        for (sample, severity) in window.flagged() {
            let date = sample.timestamp.format(DATE_FORMAT).to_string();
            let temp = format_celsius(sample.temperature);
            warnings.push(match severity {
                HeatSeverity::SevereHeatWave => {
                    format!("SEVERE HEAT WAVE WARNING: {}°C on {}", temp, date)
                }
                _ => format!("Heat Wave Alert: {}°C on {}", temp, date),
            });
            heat_wave_days.push(HeatWaveDay {
                date,
                temp: sample.temperature,
                severity: severity.label().to_string(),
                risk: severity.risk().to_string(),
            });
        }

        let safety_advice = AdviceLevel::for_flagged_count(heat_wave_days.len())
            .message()
            .to_string();

        Self {
            city: city.to_string(),
            prediction_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            heat_wave_days,
            warnings,
            safety_advice,
        }
    }
}

pub struct HeatWavePredictor {
    provider: Arc<dyn ForecastProvider>,
}

impl HeatWavePredictor {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn predict(&self, city: &str) -> Result<HeatWavePrediction, ApiError> {
        let samples = self.provider.forecast(city).await?;
        let window = PredictionWindow::from_forecast(samples);
        if window.is_empty() {
            tracing::warn!("Forecast for {} returned no buckets", city);
        }
        let prediction = HeatWavePrediction::from_window(city, &window, Utc::now());
        tracing::info!(
            "Heat-wave prediction for {}: {} of {} bucket(s) flagged",
            city,
            prediction.heat_wave_days.len(),
            window.len()
        );
        Ok(prediction)
    }
}

/// Keeps one decimal for whole numbers so 40 reads as `40.0`.
fn format_celsius(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

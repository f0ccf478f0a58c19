use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::forecast::{ForecastProvider, ForecastSample};
use crate::core::errors::ApiError;

const PROVIDER_NAME: &str = "simulated";

/// Temperature used for every bucket of a city without a scripted scenario.
const MILD_CELSIUS: f64 = 32.0;

/// Deterministic demo forecasts for exercising the heat-wave path offline.
#[derive(Debug, Clone, Default)]
pub struct SimulatedForecastProvider;

impl SimulatedForecastProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ForecastProvider for SimulatedForecastProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ApiError> {
        Ok(scenario(city))
    }
}

fn scenario(city: &str) -> Vec<ForecastSample> {
    let scripted: &[(u32, u32, f64)] = match city.trim().to_lowercase().as_str() {
        "delhi" => &[(10, 15, 42.5), (11, 12, 46.2)],
        "mumbai" => &[(10, 14, 41.8)],
        "chennai" => &[(10, 13, 47.3), (11, 15, 44.1)],
        _ => &[],
    };

    if scripted.is_empty() {
        let start = at(10, 0);
        return (0..8)
            .map(|bucket| ForecastSample {
                timestamp: start + Duration::hours(3 * bucket),
                temperature: MILD_CELSIUS,
            })
            .collect();
    }

    scripted
        .iter()
        .map(|&(day, hour, temperature)| ForecastSample {
            timestamp: at(day, hour),
            temperature,
        })
        .collect()
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 11, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delhi_has_two_scripted_buckets() {
        let samples = SimulatedForecastProvider::new().forecast("delhi").await.unwrap();
        let temps: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
        assert_eq!(temps, vec![42.5, 46.2]);
        assert_eq!(
            samples[1].timestamp.format("%Y-%m-%d %H:%M").to_string(),
            "2024-11-11 12:00"
        );
    }

    #[tokio::test]
    async fn other_cities_stay_mild() {
        let samples = SimulatedForecastProvider::new().forecast("Pune").await.unwrap();
        assert_eq!(samples.len(), 8);
        assert!(samples.iter().all(|s| s.temperature < 40.0));
    }
}

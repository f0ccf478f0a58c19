use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::forecast::{ForecastProvider, ForecastSample};
use crate::core::errors::ApiError;
use crate::core::http::{send_with_retry, RetryPolicy};

const PROVIDER_NAME: &str = "openweathermap";

/// 5-day / 3-hour forecast from the OpenWeatherMap REST API, in Celsius.
#[derive(Clone)]
pub struct OpenWeatherMapProvider {
    base_url: String,
    api_key: Option<String>,
    country: String,
    client: Client,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

#[derive(Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainBlock,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl OpenWeatherMapProvider {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        country: String,
        client: Client,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            country,
            client,
            retry,
        }
    }

    fn location(&self, city: &str) -> String {
        if self.country.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, self.country)
        }
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherMapProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ApiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ApiError::upstream(PROVIDER_NAME, "no API key configured"));
        };

        let url = format!("{}/forecast", self.base_url);
        let location = self.location(city);
        let res = send_with_retry(self.retry, || {
            self.client.get(&url).query(&[
                ("q", location.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
        })
        .await
        .map_err(|e| ApiError::upstream(PROVIDER_NAME, e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            let message = match status {
                StatusCode::UNAUTHORIZED => format!("invalid API key ({})", detail),
                StatusCode::NOT_FOUND => format!("unknown city '{}' ({})", city, detail),
                _ => format!("HTTP {}: {}", status, detail),
            };
            return Err(ApiError::upstream(PROVIDER_NAME, message));
        }

        let payload: ForecastResponse = res
            .json()
            .await
            .map_err(|e| ApiError::upstream(PROVIDER_NAME, e.without_url()))?;

        payload
            .list
            .into_iter()
            .map(|item| {
                let timestamp = DateTime::from_timestamp(item.dt, 0).ok_or_else(|| {
                    ApiError::upstream(PROVIDER_NAME, format!("invalid timestamp {}", item.dt))
                })?;
                Ok(ForecastSample {
                    timestamp,
                    temperature: item.main.temp,
                })
            })
            .collect()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::ApiError;

/// One 3-hour forecast bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    fn name(&self) -> &str;

    /// 3-hour buckets for the coming days, earliest first.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ApiError>;
}

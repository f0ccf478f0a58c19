//! Outbound HTTP plumbing shared by the embedding and forecast providers.
//!
//! Every call gets a bounded timeout (set on the client) and at most one
//! retry after a short backoff. Only transport failures and 5xx responses
//! are retried; 4xx responses are returned to the caller untouched.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};

use crate::core::config::settings::HttpSettings;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(settings.retry_backoff_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&HttpSettings::default())
    }
}

pub fn build_client(settings: &HttpSettings) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.timeout_secs))
        .build()
}

/// Sends the request built by `make_request`, rebuilding it for the retry.
pub async fn send_with_retry<F>(policy: RetryPolicy, make_request: F) -> reqwest::Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 1;
    loop {
        match make_request().send().await {
            Ok(response) if response.status().is_server_error() && attempt < policy.max_attempts => {
                tracing::warn!(
                    "Upstream returned {} on attempt {}; retrying",
                    response.status(),
                    attempt
                );
            }
            Ok(response) => return Ok(response),
            Err(err) if is_retryable(&err) && attempt < policy.max_attempts => {
                tracing::warn!("Upstream request failed on attempt {}: {}; retrying", attempt, err);
            }
            Err(err) => return Err(err),
        }

        let delay = policy.backoff.saturating_mul(1 << (attempt - 1).min(16));
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

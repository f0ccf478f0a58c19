use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::EmbeddingProvider;
use crate::core::errors::ApiError;
use crate::core::http::{send_with_retry, RetryPolicy};

const PROVIDER_NAME: &str = "embedding";

/// Client for any OpenAI-compatible `/v1/embeddings` endpoint.
#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        client: Client,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client,
            retry,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let res = send_with_retry(self.retry, || {
            let request = self.client.post(&url).json(&body);
            match &self.api_key {
                Some(key) => request.bearer_auth(key),
                None => request,
            }
        })
        .await
        .map_err(|e| ApiError::upstream(PROVIDER_NAME, e))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::upstream(
                PROVIDER_NAME,
                format!("HTTP {}: {}", status, text),
            ));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| ApiError::upstream(PROVIDER_NAME, e))?;

        let data = payload["data"]
            .as_array()
            .ok_or_else(|| ApiError::upstream(PROVIDER_NAME, "response has no data array"))?;

        let mut items = data
            .iter()
            .map(|item| {
                let values = item["embedding"].as_array().ok_or_else(|| {
                    ApiError::upstream(PROVIDER_NAME, "response item has no embedding")
                })?;
                let vector = values
                    .iter()
                    .map(|v| {
                        v.as_f64().map(|f| f as f32).ok_or_else(|| {
                            ApiError::upstream(PROVIDER_NAME, "non-numeric embedding value")
                        })
                    })
                    .collect::<Result<Vec<f32>, ApiError>>()?;
                Ok((item["index"].as_u64(), vector))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        // Stable sort: items missing an index keep their relative order.
        items.sort_by_key(|(index, _)| *index);
        let embeddings: Vec<Vec<f32>> = items.into_iter().map(|(_, vector)| vector).collect();

        if embeddings.len() != inputs.len() {
            return Err(ApiError::upstream(
                PROVIDER_NAME,
                format!(
                    "requested {} embeddings but received {}",
                    inputs.len(),
                    embeddings.len()
                ),
            ));
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::settings::HttpSettings;
    use crate::core::http::build_client;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, api_key: Option<&str>) -> OpenAiEmbeddingProvider {
        OpenAiEmbeddingProvider::new(
            server.uri(),
            "text-embedding-3-small".to_string(),
            api_key.map(str::to_string),
            build_client(&HttpSettings::default()).unwrap(),
            RetryPolicy {
                max_attempts: 2,
                backoff: Duration::from_millis(1),
            },
        )
    }

    #[tokio::test]
    async fn embeds_inputs_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "text-embedding-3-small" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "index": 0, "embedding": [0.1, 0.2] },
                    { "index": 1, "embedding": [0.3, 0.4] }
                ]
            })))
            .mount(&server)
            .await;

        let vectors = provider(&server, Some("sk-test"))
            .embed(&["flood".to_string(), "fire".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![0.1f32, 0.2], vec![0.3f32, 0.4]]);
    }

    #[tokio::test]
    async fn unauthorized_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server, None).embed_one("flood").await.unwrap_err();

        match err {
            ApiError::UpstreamUnavailable { provider, message } => {
                assert_eq!(provider, "embedding");
                assert!(message.contains("401"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_response_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = provider(&server, None).embed_one("flood").await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn results_follow_the_response_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "index": 1, "embedding": [0.3, 0.4] },
                    { "index": 0, "embedding": [0.1, 0.2] }
                ]
            })))
            .mount(&server)
            .await;

        let vectors = provider(&server, None)
            .embed(&["flood".to_string(), "fire".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![0.1f32, 0.2], vec![0.3f32, 0.4]]);
    }

    #[tokio::test]
    async fn non_numeric_values_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "index": 0, "embedding": [0.1, "x", 0.3] }]
            })))
            .mount(&server)
            .await;

        let err = provider(&server, None).embed_one("flood").await.unwrap_err();

        match err {
            ApiError::UpstreamUnavailable { message, .. } => {
                assert!(message.contains("non-numeric embedding value"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

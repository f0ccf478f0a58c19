use async_trait::async_trait;

use crate::core::errors::ApiError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// provider name used in logs and upstream error messages
    fn name(&self) -> &str;

    /// embed each input; the result is aligned with `inputs`
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;

    /// embed a single query string
    async fn embed_one(&self, input: &str) -> Result<Vec<f32>, ApiError> {
        let mut vectors = self.embed(&[input.to_string()]).await?;
        match vectors.pop() {
            Some(vector) if vectors.is_empty() => Ok(vector),
            _ => Err(ApiError::upstream(
                self.name(),
                "expected exactly one embedding in response",
            )),
        }
    }
}

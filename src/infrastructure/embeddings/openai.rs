use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::infrastructure::http::{parse_error, request_error, status_error, RetryPolicy};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "OpenAI embeddings";

pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(
        client: Client,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        dimension: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com".to_string()),
            dimension,
            retry,
        }
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = format!("{}/v1/embeddings", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input: text,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(PROVIDER, status, &body));
        }

        let result: EmbeddingResponse = resp.json().await.map_err(|e| parse_error(PROVIDER, e))?;
        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| parse_error(PROVIDER, "no embedding in response"))
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidInput("Cannot embed empty text".into()));
        }

        let vector = self.retry.run(PROVIDER, || self.request(text)).await?;
        if vector.len() != self.dimension {
            return Err(DomainError::InvalidVector(format!(
                "{} returned dimension {} but {} is configured",
                self.model,
                vector.len(),
                self.dimension
            )));
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

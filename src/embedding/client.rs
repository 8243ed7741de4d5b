//! Embedding client for OpenAI-compatible embedding endpoints

use super::{EmbeddingProvider, models::*};
use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Text used to discover the model dimension at startup
const PROBE_TEXT: &str = "test";

/// Client for generating embeddings over HTTP
pub struct EmbeddingClient {
    config: EmbeddingConfig,
    http_client: Client,
    vector_size: usize,
}

impl EmbeddingClient {
    /// Create a client and resolve the model's vector size.
    ///
    /// A configured `vector_size` is trusted as is; otherwise one probe
    /// request is made and its output length becomes the fixed dimension.
    pub async fn connect(config: EmbeddingConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(EmbeddingError::NetworkError)?;

        Self::with_http_client(config, http_client).await
    }

    /// Create client with custom HTTP client
    pub async fn with_http_client(config: EmbeddingConfig, http_client: Client) -> Result<Self> {
        info!("Initializing embedding model: {}", config.model);

        let mut client = Self {
            config,
            http_client,
            vector_size: 0,
        };

        client.vector_size = match client.config.vector_size {
            Some(size) => size,
            None => {
                let probe = client.request(vec![PROBE_TEXT.to_string()]).await?;
                probe
                    .first()
                    .map(Vec::len)
                    .ok_or_else(|| EmbeddingError::ApiError("No embeddings returned".to_string()))?
            }
        };

        info!("Model loaded successfully. Vector size: {}", client.vector_size);
        Ok(client)
    }

    /// Make a single API request for one chunk of texts
    async fn request(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = texts.len();
        let body = EmbeddingRequest::new(self.config.model.clone(), texts);

        debug!("Requesting {} embeddings from {}", expected, self.config.api_url);

        let mut request = self.http_client
            .post(&self.config.api_url)
            .json(&body);

        if let Some(key) = &self.config.api_key {
            if !key.expose_secret().is_empty() {
                request = request.bearer_auth(key.expose_secret());
            }
        }

        let response = request
            .send()
            .await
            .map_err(EmbeddingError::NetworkError)?;

        let status = response.status();

        match status {
            StatusCode::OK => {
                let embedding_response: EmbeddingResponse = response
                    .json()
                    .await
                    .map_err(EmbeddingError::NetworkError)?;

                let vectors = embedding_response.into_vectors();
                if vectors.len() != expected {
                    return Err(EmbeddingError::ApiError(format!(
                        "Expected {} embeddings, received {}",
                        expected,
                        vectors.len()
                    )).into());
                }

                debug!("Received {} embeddings", vectors.len());
                Ok(vectors)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Embedding endpoint rejected credentials");
                Err(EmbeddingError::AuthenticationFailed.into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Embedding rate limit exceeded");
                Err(EmbeddingError::RateLimitExceeded.into())
            }
            _ => {
                let error_text = response.text().await.unwrap_or_default();
                error!("Embedding request failed with status {}: {}", status, error_text);
                Err(EmbeddingError::ApiError(format!(
                    "Status {}: {}",
                    status, error_text
                )).into())
            }
        }
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(EmbeddingError::InvalidInput("Texts cannot be empty".to_string()).into());
        }

        if texts.iter().any(|t| t.is_empty()) {
            return Err(EmbeddingError::InvalidInput("Text cannot be empty".to_string()).into());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size) {
            vectors.extend(self.request(chunk.to_vec()).await?);
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.vector_size) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.vector_size,
                actual: bad.len(),
            }.into());
        }

        Ok(vectors)
    }

    fn vector_size(&self) -> usize {
        self.vector_size
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

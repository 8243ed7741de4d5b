//! Embedding providers turning text into fixed-length vectors

pub mod client;
pub mod models;

pub use client::EmbeddingClient;
pub use models::{EmbeddingRequest, EmbeddingResponse, EmbeddingData};

use async_trait::async_trait;
use crate::error::{EmbeddingError, Result};

/// Trait for embedding providers
///
/// One instance is created at startup and shared behind an `Arc` by every
/// component that embeds text, so `vector_size` never changes while the
/// process runs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| EmbeddingError::ApiError("No embeddings returned".to_string()).into())
    }

    /// Dimension of every vector this provider produces
    fn vector_size(&self) -> usize;

    /// Name of the underlying model
    fn model_name(&self) -> &str;
}

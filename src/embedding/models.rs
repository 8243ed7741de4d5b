//! Data models for OpenAI-compatible embedding requests and responses

use serde::{Deserialize, Serialize};

/// Request to generate embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Input texts to embed
    pub input: Vec<String>,

    /// Model name
    pub model: String,
}

/// Response from embedding generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Generated embeddings
    pub data: Vec<EmbeddingData>,

    /// Model used for generation
    #[serde(default)]
    pub model: Option<String>,

    /// Usage statistics
    #[serde(default)]
    pub usage: Option<UsageStats>,
}

/// Individual embedding data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingData {
    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Index in the batch
    pub index: usize,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: usize,
    pub total_tokens: usize,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            input: texts,
            model: model.into(),
        }
    }
}

impl EmbeddingResponse {
    /// Vectors ordered by their batch index
    pub fn into_vectors(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().map(|d| d.embedding).collect()
    }
}

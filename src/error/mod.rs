//! Error types for the MCP tool server

use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Main error type for the tool server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors related to embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unexpected embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors related to vector database operations
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid ID format: {0}")]
    InvalidIdFormat(String),

    #[error("Invalid distance metric: {0}")]
    InvalidDistance(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Qdrant client error: {0}")]
    QdrantError(#[from] qdrant_client::QdrantError),
}

/// Errors raised while adapting tool calls
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Errors related to the JSON-RPC protocol
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Message too large: {size} bytes (max: {max_size} bytes)")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl ServerError {
    /// Message of the underlying error without the category prefix,
    /// as reported back to tool callers
    pub fn detail(&self) -> String {
        match self {
            ServerError::Embedding(e) => e.to_string(),
            ServerError::VectorDb(VectorDbError::QdrantError(e)) => e.to_string(),
            ServerError::VectorDb(e) => e.to_string(),
            ServerError::Tool(e) => e.to_string(),
            ServerError::Protocol(e) => e.to_string(),
            ServerError::Config(msg) | ServerError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for ServerError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        ServerError::VectorDb(VectorDbError::QdrantError(err))
    }
}

//! Configuration validation

use super::*;
use crate::error::{ServerError, Result};

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_vector_db_config(&config.vector_db)?;
    validate_embedding_config(&config.embedding)?;
    validate_logging_config(&config.logging)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validate vector database configuration
fn validate_vector_db_config(config: &VectorDbConfig) -> Result<()> {
    if config.host.trim().is_empty() {
        return Err(ServerError::Config(
            "Vector database host cannot be empty".to_string()
        ));
    }

    if config.default_collection.trim().is_empty() {
        return Err(ServerError::Config(
            "Default collection name cannot be empty".to_string()
        ));
    }

    if config.vector_name.is_empty() {
        return Err(ServerError::Config(
            "Vector name cannot be empty".to_string()
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ServerError::Config(
            "Vector database timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate embedding configuration
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<()> {
    if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
        return Err(ServerError::Config(
            "Embedding API URL must start with http:// or https://".to_string()
        ));
    }

    if config.model.trim().is_empty() {
        return Err(ServerError::Config(
            "Embedding model name cannot be empty".to_string()
        ));
    }

    if config.vector_size == Some(0) {
        return Err(ServerError::Config(
            "Embedding vector size must be greater than 0".to_string()
        ));
    }

    if config.batch_size == 0 {
        return Err(ServerError::Config(
            "Embedding batch size must be greater than 0".to_string()
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ServerError::Config(
            "Embedding timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    match config.format.as_str() {
        "json" | "compact" | "pretty" => Ok(()),
        other => Err(ServerError::Config(format!(
            "Unknown log format '{}' (expected json, compact or pretty)",
            other
        ))),
    }
}

/// Validate server configuration
fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.max_message_size_mb == 0 {
        return Err(ServerError::Config(
            "Max message size must be greater than 0".to_string()
        ));
    }

    if config.transport == TransportKind::Http && config.port == 0 {
        return Err(ServerError::Config(
            "HTTP transport requires a non-zero port".to_string()
        ));
    }

    Ok(())
}

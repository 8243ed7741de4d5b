//! Configuration management for the tool server

use serde::{Deserialize, Serialize};
use std::path::Path;
use secrecy::{Secret, ExposeSecret};

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vector_db: VectorDbConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings for the Qdrant database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// Host name, optionally prefixed with `http://` or `https://`
    #[serde(default = "default_host")]
    pub host: String,

    /// Port as given by the operator. Kept as text so that a malformed
    /// value can be reported and ignored instead of failing startup.
    #[serde(default = "default_port")]
    pub port: Option<String>,

    /// API key (optional, secured)
    #[serde(default, serialize_with = "serialize_optional_secret", deserialize_with = "deserialize_optional_secret")]
    pub api_key: Option<Secret<String>>,

    /// Verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Collection used by the text tools when none is given
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// Name of the vector space in collections created by this server
    #[serde(default = "default_vector_name")]
    pub vector_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Configuration for the embedding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible embeddings endpoint
    #[serde(default = "default_embedding_url")]
    pub api_url: String,

    /// Bearer token for the endpoint (optional, secured)
    #[serde(default, serialize_with = "serialize_optional_secret", deserialize_with = "deserialize_optional_secret")]
    pub api_key: Option<Secret<String>>,

    /// Model name sent with every request
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Known output dimension. When unset the client probes the model once.
    #[serde(default)]
    pub vector_size: Option<usize>,

    /// Maximum number of texts per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json, compact or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Transport configuration for the tool-calling protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: TransportKind,

    /// Bind host for the HTTP transport
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Bind port for the HTTP transport
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Maximum size of a single JSON-RPC message in MB
    #[serde(default = "default_max_message_size")]
    pub max_message_size_mb: usize,
}

/// How JSON-RPC messages reach the server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Stdio,
    Http,
}

// Default value functions
fn default_host() -> String { "localhost".to_string() }
fn default_port() -> Option<String> { Some("6334".to_string()) }
fn default_tls_verify() -> bool { true }
fn default_collection() -> String { "default_collection".to_string() }
fn default_vector_name() -> String { "default".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_embedding_url() -> String { "http://localhost:8080/v1/embeddings".to_string() }
fn default_embedding_model() -> String { "BAAI/bge-small-en-v1.5".to_string() }
fn default_batch_size() -> usize { 64 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }
fn default_server_host() -> String { "127.0.0.1".to_string() }
fn default_server_port() -> u16 { 8000 }
fn default_max_message_size() -> usize { 10 }

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            tls_verify: default_tls_verify(),
            default_collection: default_collection(),
            vector_name: default_vector_name(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_embedding_url(),
            api_key: None,
            model: default_embedding_model(),
            vector_size: None,
            batch_size: default_batch_size(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            host: default_server_host(),
            port: default_server_port(),
            max_message_size_mb: default_max_message_size(),
        }
    }
}

impl ServerConfig {
    /// Message size limit in bytes
    pub fn max_message_bytes(&self) -> usize {
        self.max_message_size_mb * 1024 * 1024
    }
}

impl Config {
    /// Load configuration from an optional TOML file, `.env` and the process environment
    pub fn load<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_config(self)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            vector_db: VectorDbConfig::default(),
            embedding: EmbeddingConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(secret: &Option<Secret<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(Secret::new))
}

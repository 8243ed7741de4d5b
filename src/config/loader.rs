//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::{Environment, File};
use std::path::Path;

/// Prefix for structured overrides, e.g. `QDRANT_MCP__VECTOR_DB__HOST`
pub const ENV_PREFIX: &str = "QDRANT_MCP";

/// Flat variable names understood for compatibility with existing deployments
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("QDRANT_HOST", "vector_db.host"),
    ("QDRANT_PORT", "vector_db.port"),
    ("QDRANT_API_KEY", "vector_db.api_key"),
    ("QDRANT_VERIFY_SSL", "vector_db.tls_verify"),
    ("COLLECTION_NAME", "vector_db.default_collection"),
    ("EMBEDDING_MODEL", "embedding.model"),
    ("EMBEDDING_API_URL", "embedding.api_url"),
    ("EMBEDDING_API_KEY", "embedding.api_key"),
];

/// Load configuration from `.env`, an optional TOML file and the environment
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    // A missing .env file is the normal case in containers
    let _ = dotenvy::dotenv();

    build_config(path.as_ref(), |name| std::env::var(name).ok())
}

/// Layer the sources in precedence order: file, prefixed environment, flat variables
pub fn build_config<F>(path: &Path, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = config::Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
        );

    for (var, key) in LEGACY_ENV_KEYS {
        builder = builder.set_override_option(*key, lookup(var))?;
    }

    let cfg: Config = builder.build()?.try_deserialize()?;
    Ok(cfg)
}

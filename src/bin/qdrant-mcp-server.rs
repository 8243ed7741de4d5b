//! Qdrant MCP Server Binary
//!
//! Loads configuration, connects the embedding endpoint and Qdrant, and
//! serves the tools over the configured transport until input ends or a
//! shutdown signal arrives.

use anyhow::Context;
use qdrant_mcp_server::{
    config::{Config, LoggingConfig, TransportKind},
    embedding::{EmbeddingClient, EmbeddingProvider},
    protocol::{serve_stdio, McpHandler, MessageHandler},
    server::{start_server, ServerState},
    shutdown::ShutdownCoordinator,
    tools::build_registry,
    vector_db::{QdrantStore, VectorStore},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from file and environment
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    init_tracing(&config.logging);

    info!("Starting Qdrant MCP Server");
    info!("Configuration loaded and validated from {}", config_path);

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        EmbeddingClient::connect(config.embedding.clone())
            .await
            .context("failed to initialize embedding model")?,
    );

    let store: Arc<dyn VectorStore> = Arc::new(
        QdrantStore::connect(&config.vector_db)
            .await
            .context("failed to connect to Qdrant")?,
    );

    let registry = build_registry(store, embedder, config.vector_db.default_collection.clone());
    info!("Registered {} tools", registry.len());

    let handler: Arc<dyn MessageHandler> = Arc::new(
        McpHandler::new(registry).with_max_message_size(config.server.max_message_bytes()),
    );

    let coordinator = Arc::new(ShutdownCoordinator::new());
    let shutdown = coordinator.subscribe();
    {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.wait_for_signal().await });
    }

    match config.server.transport {
        TransportKind::Stdio => serve_stdio(handler, shutdown).await?,
        TransportKind::Http => {
            let addr = format!("{}:{}", config.server.host, config.server.port);
            start_server(
                &addr,
                ServerState { handler },
                config.server.max_message_bytes(),
                shutdown,
            )
            .await?
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Install the global subscriber. Logs go to stderr so stdout stays a clean
/// JSON-RPC channel.
fn init_tracing(logging: &LoggingConfig) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level.clone()))
    };

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_env_filter(filter())
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .compact()
                .with_env_filter(filter())
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .pretty()
                .with_env_filter(filter())
                .init();
        }
    }
}

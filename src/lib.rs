//! Qdrant MCP Server - vector database and text embedding tools over MCP
//!
//! Exposes Qdrant collections, points and similarity search, plus a
//! text-to-vector workflow, as Model Context Protocol tools that an agent
//! can call over stdio or HTTP.
//!
//! ## Features
//!
//! - **Collection management**: list, inspect, create and delete collections
//! - **Point management**: fetch, delete and count points by id
//! - **Vector search**: raw vector similarity search, upsert and filtered scans
//! - **Text tools**: embed and store text, search by meaning with payload filters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qdrant_mcp_server::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load("config.toml")?;
//!
//!     let embedder = Arc::new(EmbeddingClient::connect(config.embedding.clone()).await?);
//!     let store = Arc::new(QdrantStore::connect(&config.vector_db).await?);
//!
//!     let registry = build_registry(store, embedder, config.vector_db.default_collection.clone());
//!     let handler = Arc::new(McpHandler::new(registry));
//!
//!     let coordinator = ShutdownCoordinator::new();
//!     serve_stdio(handler, coordinator.subscribe()).await
//! }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod protocol;
pub mod server;
pub mod shutdown;
pub mod tools;
pub mod vector_db;

pub use config::Config;
pub use error::{Result, ServerError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, TransportKind};
    pub use crate::embedding::{EmbeddingClient, EmbeddingProvider};
    pub use crate::error::{Result, ServerError};
    pub use crate::protocol::{serve_stdio, Codec, McpHandler, MessageHandler};
    pub use crate::shutdown::{ShutdownCoordinator, ShutdownNotifier};
    pub use crate::tools::{build_registry, ToolOutput, ToolRegistry};
    pub use crate::vector_db::{
        CollectionStore, Distance, Filter, PointId, PointStore, QdrantStore, SearchStore,
        VectorStore,
    };
}

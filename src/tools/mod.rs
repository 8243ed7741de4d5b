//! Tools exposed over MCP
//!
//! Each group wraps the shared store (and, for text tools, the embedding
//! provider) and registers its tools with a [`ToolRegistry`]. Tool bodies
//! never fail the call: store and embedding errors come back as
//! `Error: <message>` text.

pub mod collection;
pub mod point;
pub mod registry;
pub mod text;
pub mod vector;

pub use collection::CollectionTools;
pub use point::PointTools;
pub use registry::{ToolDescriptor, ToolOutput, ToolRegistry};
pub use text::TextTools;
pub use vector::VectorTools;

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, VectorDbError};
use crate::vector_db::{OperationInfo, PointId, VectorStore};
use serde::Serialize;
use std::sync::Arc;

/// Default result limit for searches
pub(crate) fn default_limit() -> u64 {
    10
}

/// Pretty JSON rendering used for structured tool results
pub(crate) fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VectorDbError::SerializationError(e.to_string()).into())
}

/// Compact JSON of a write acknowledgement, e.g. `{"operation_id":3,"status":"Completed"}`
pub(crate) fn operation_summary(info: &OperationInfo) -> Result<String> {
    serde_json::to_string(info).map_err(|e| VectorDbError::SerializationError(e.to_string()).into())
}

/// Validate caller ids before they reach the store
pub(crate) fn normalize_ids(ids: Vec<PointId>) -> Result<Vec<PointId>> {
    ids.into_iter()
        .map(|id| id.normalized().map_err(Into::into))
        .collect()
}

/// Build the registry with every tool group.
///
/// Registration order is the order reported by `tools/list`.
pub fn build_registry(
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    default_collection: impl Into<String>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    Arc::new(CollectionTools::new(Arc::clone(&store))).register(&mut registry);
    Arc::new(PointTools::new(Arc::clone(&store))).register(&mut registry);
    Arc::new(VectorTools::new(Arc::clone(&store))).register(&mut registry);
    Arc::new(TextTools::new(store, embedder, default_collection)).register(&mut registry);

    registry
}

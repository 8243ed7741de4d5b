//! Vector database integration with Qdrant

pub mod client;
pub mod connection;
pub mod convert;
pub mod models;

pub use client::QdrantStore;
pub use connection::ConnectionSettings;
pub use models::{
    CollectionInfo, CollectionSummary, Condition, Distance, Filter, OperationInfo, Payload,
    PointId, RetrievedPoint, ScoredPoint, ScrollPage, SearchParams, VectorPoint, VectorSpace,
};

use crate::error::Result;
use async_trait::async_trait;

/// Collection lifecycle
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>>;

    /// Descriptor of one collection; a missing collection is an error
    async fn collection_info(&self, name: &str) -> Result<CollectionInfo>;

    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Create a collection with one named vector space. An existing
    /// collection of the same name is left untouched.
    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()>;

    /// Create a collection with one named vector space, replacing any
    /// existing collection of the same name
    async fn recreate_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()>;

    async fn delete_collection(&self, name: &str) -> Result<()>;
}

/// Point storage by id
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Insert or overwrite points in a single write
    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<OperationInfo>;

    async fn get_points(
        &self,
        collection: &str,
        ids: &[PointId],
        with_vectors: bool,
    ) -> Result<Vec<RetrievedPoint>>;

    /// Delete by id. Unknown ids are ignored.
    async fn delete_points(&self, collection: &str, ids: &[PointId]) -> Result<OperationInfo>;

    /// Exact number of points
    async fn count_points(&self, collection: &str) -> Result<u64>;
}

/// Similarity search and filtered scans
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Nearest neighbours of `params.vector`, best first
    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<ScoredPoint>>;

    /// Points matching `filter`, without similarity ranking
    async fn scroll(&self, collection: &str, filter: Filter, limit: u32) -> Result<ScrollPage>;
}

/// Everything the tools need from a vector database
pub trait VectorStore: CollectionStore + PointStore + SearchStore {}

impl<T: CollectionStore + PointStore + SearchStore + ?Sized> VectorStore for T {}

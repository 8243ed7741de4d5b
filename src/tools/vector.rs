//! Raw vector tools: similarity search, upsert and filtered scans

use super::registry::{ToolOutput, ToolRegistry};
use super::{default_limit, normalize_ids, operation_summary, render};
use crate::error::{Result, ToolError};
use crate::vector_db::{Filter, Payload, PointId, SearchParams, VectorPoint, VectorStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SearchVectorsArgs {
    pub collection_name: String,
    pub vector: Vec<f32>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub with_vectors: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpsertVectorsArgs {
    pub collection_name: String,
    pub vectors: Vec<Vec<f32>>,
    pub ids: Vec<PointId>,
    #[serde(default)]
    pub metadata: Option<Vec<Payload>>,
}

#[derive(Debug, Deserialize)]
pub struct FilterSearchArgs {
    pub collection_name: String,
    pub filter_json: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

pub struct VectorTools {
    store: Arc<dyn VectorStore>,
}

impl VectorTools {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub async fn search_vectors(&self, args: SearchVectorsArgs) -> ToolOutput {
        info!("Searching vectors in collection {}", args.collection_name);
        ToolOutput::from_result("search_vectors", self.try_search_vectors(args).await)
    }

    async fn try_search_vectors(&self, args: SearchVectorsArgs) -> Result<String> {
        let params = SearchParams::new(args.vector, args.limit).with_vector(args.with_vectors);
        let results = self.store.search(&args.collection_name, params).await?;
        render(&results)
    }

    pub async fn upsert_vectors(&self, args: UpsertVectorsArgs) -> ToolOutput {
        info!("Upserting vectors to collection {}", args.collection_name);
        ToolOutput::from_result("upsert_vectors", self.try_upsert_vectors(args).await)
    }

    async fn try_upsert_vectors(&self, args: UpsertVectorsArgs) -> Result<String> {
        if args.ids.len() < args.vectors.len() {
            return Err(ToolError::InvalidArguments(format!(
                "{} vectors but only {} ids",
                args.vectors.len(),
                args.ids.len()
            ))
            .into());
        }

        let ids = normalize_ids(args.ids)?;
        let mut metadata = args.metadata.unwrap_or_default().into_iter();

        let points: Vec<VectorPoint> = args
            .vectors
            .into_iter()
            .zip(ids)
            .map(|(vector, id)| VectorPoint {
                id,
                vector,
                payload: metadata.next().unwrap_or_default(),
            })
            .collect();

        let info = self.store.upsert_points(&args.collection_name, points).await?;
        Ok(format!("Vectors uploaded successfully: {}", operation_summary(&info)?))
    }

    /// Scan a collection with a payload filter given as JSON text
    pub async fn filter_search(&self, args: FilterSearchArgs) -> ToolOutput {
        info!("Searching with filter in collection {}", args.collection_name);

        let filter = match Filter::from_json(&args.filter_json) {
            Ok(filter) => filter,
            Err(ToolError::InvalidFilter(msg)) => {
                error!("Invalid filter JSON: {}", msg);
                return ToolOutput::failure(format!("Error: Invalid filter JSON - {}", msg));
            }
            Err(e) => return ToolOutput::failure(format!("Error: {}", e)),
        };

        let limit = u32::try_from(args.limit).unwrap_or(u32::MAX);
        let result = self
            .store
            .scroll(&args.collection_name, filter, limit)
            .await
            .and_then(|page| render(&page));
        ToolOutput::from_result("filter_search", result)
    }

    pub fn register(self: Arc<Self>, registry: &mut ToolRegistry) {
        let tools = Arc::clone(&self);
        registry.register(
            "search_vectors",
            "Search for similar vectors in a collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"},
                    "vector": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "Query vector for similarity search"
                    },
                    "limit": {"type": "integer", "default": 10, "description": "Maximum number of results to return"},
                    "with_vectors": {
                        "type": "boolean",
                        "default": false,
                        "description": "Whether to include vector data in the response"
                    }
                },
                "required": ["collection_name", "vector"]
            }),
            move |args: SearchVectorsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.search_vectors(args).await }
            },
        );

        let tools = Arc::clone(&self);
        registry.register(
            "upsert_vectors",
            "Upload vectors to a collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"},
                    "vectors": {
                        "type": "array",
                        "items": {"type": "array", "items": {"type": "number"}},
                        "description": "List of vectors to upload"
                    },
                    "ids": {
                        "type": "array",
                        "items": {"type": ["string", "integer"]},
                        "description": "List of IDs for the vectors"
                    },
                    "metadata": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "Optional metadata for each vector"
                    }
                },
                "required": ["collection_name", "vectors", "ids"]
            }),
            move |args: UpsertVectorsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.upsert_vectors(args).await }
            },
        );

        let tools = self;
        registry.register(
            "filter_search",
            "Search collection with filter",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"},
                    "filter_json": {
                        "type": "string",
                        "description": "JSON string representing the filter condition"
                    },
                    "limit": {"type": "integer", "default": 10, "description": "Maximum number of results to return"}
                },
                "required": ["collection_name", "filter_json"]
            }),
            move |args: FilterSearchArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.filter_search(args).await }
            },
        );
    }
}

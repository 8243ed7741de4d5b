//! Point management tools

use super::registry::{ToolOutput, ToolRegistry};
use super::{normalize_ids, operation_summary, render};
use crate::error::Result;
use crate::vector_db::{PointId, VectorStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct GetPointsArgs {
    pub collection_name: String,
    pub ids: Vec<PointId>,
    #[serde(default)]
    pub with_vectors: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeletePointsArgs {
    pub collection_name: String,
    pub ids: Vec<PointId>,
}

#[derive(Debug, Deserialize)]
pub struct CountPointsArgs {
    pub collection_name: String,
}

pub struct PointTools {
    store: Arc<dyn VectorStore>,
}

impl PointTools {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub async fn get_points(&self, args: GetPointsArgs) -> ToolOutput {
        info!(
            "Getting points from collection {} with IDs: {:?}",
            args.collection_name, args.ids
        );
        ToolOutput::from_result("get_points", self.try_get_points(args).await)
    }

    async fn try_get_points(&self, args: GetPointsArgs) -> Result<String> {
        let ids = normalize_ids(args.ids)?;
        let points = self
            .store
            .get_points(&args.collection_name, &ids, args.with_vectors)
            .await?;
        render(&points)
    }

    pub async fn delete_points(&self, args: DeletePointsArgs) -> ToolOutput {
        info!(
            "Deleting points from collection {} with IDs: {:?}",
            args.collection_name, args.ids
        );
        ToolOutput::from_result("delete_points", self.try_delete_points(args).await)
    }

    async fn try_delete_points(&self, args: DeletePointsArgs) -> Result<String> {
        let ids = normalize_ids(args.ids)?;
        let info = self.store.delete_points(&args.collection_name, &ids).await?;
        Ok(format!("Points deleted successfully: {}", operation_summary(&info)?))
    }

    pub async fn count_points(&self, args: CountPointsArgs) -> ToolOutput {
        info!("Counting points in collection: {}", args.collection_name);
        let result = self
            .store
            .count_points(&args.collection_name)
            .await
            .map(|count| format!("Count: {}", count));
        ToolOutput::from_result("count_points", result)
    }

    pub fn register(self: Arc<Self>, registry: &mut ToolRegistry) {
        let tools = Arc::clone(&self);
        registry.register(
            "get_points",
            "Get points from a collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"},
                    "ids": {
                        "type": "array",
                        "items": {"type": ["string", "integer"]},
                        "description": "List of point IDs to retrieve"
                    },
                    "with_vectors": {
                        "type": "boolean",
                        "default": false,
                        "description": "Whether to include vector data in the response"
                    }
                },
                "required": ["collection_name", "ids"]
            }),
            move |args: GetPointsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.get_points(args).await }
            },
        );

        let tools = Arc::clone(&self);
        registry.register(
            "delete_points",
            "Delete points from a collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"},
                    "ids": {
                        "type": "array",
                        "items": {"type": ["string", "integer"]},
                        "description": "List of point IDs to delete"
                    }
                },
                "required": ["collection_name", "ids"]
            }),
            move |args: DeletePointsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.delete_points(args).await }
            },
        );

        let tools = self;
        registry.register(
            "count_points",
            "Count points in a collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection"}
                },
                "required": ["collection_name"]
            }),
            move |args: CountPointsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.count_points(args).await }
            },
        );
    }
}

//! Collection management tools

use super::registry::{ToolOutput, ToolRegistry};
use super::render;
use crate::error::Result;
use crate::vector_db::{Distance, VectorStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct NoArgs {}

#[derive(Debug, Deserialize)]
pub struct CollectionArgs {
    pub collection_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCollectionArgs {
    pub collection_name: String,
    pub vector_size: u64,
    #[serde(default = "default_distance")]
    pub distance: String,
}

fn default_distance() -> String {
    Distance::default().to_string()
}

pub struct CollectionTools {
    store: Arc<dyn VectorStore>,
}

impl CollectionTools {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub async fn list_collections(&self) -> ToolOutput {
        info!("Listing collections...");
        ToolOutput::from_result("list_collections", self.try_list_collections().await)
    }

    async fn try_list_collections(&self) -> Result<String> {
        let collections = self.store.list_collections().await?;
        render(&json!({ "collections": collections }))
    }

    pub async fn get_collection(&self, args: CollectionArgs) -> ToolOutput {
        info!("Getting collection info: {}", args.collection_name);
        ToolOutput::from_result("get_collection", self.try_get_collection(&args).await)
    }

    async fn try_get_collection(&self, args: &CollectionArgs) -> Result<String> {
        let info = self.store.collection_info(&args.collection_name).await?;
        render(&info)
    }

    pub async fn create_collection(&self, args: CreateCollectionArgs) -> ToolOutput {
        info!("Creating collection: {}", args.collection_name);
        ToolOutput::from_result("create_collection", self.try_create_collection(&args).await)
    }

    async fn try_create_collection(&self, args: &CreateCollectionArgs) -> Result<String> {
        let distance: Distance = args.distance.parse()?;
        self.store
            .recreate_collection(&args.collection_name, args.vector_size, distance)
            .await?;
        Ok(format!("Collection {} created successfully", args.collection_name))
    }

    pub async fn delete_collection(&self, args: CollectionArgs) -> ToolOutput {
        info!("Deleting collection: {}", args.collection_name);
        let result = self
            .store
            .delete_collection(&args.collection_name)
            .await
            .map(|_| format!("Collection {} deleted successfully", args.collection_name));
        ToolOutput::from_result("delete_collection", result)
    }

    pub fn register(self: Arc<Self>, registry: &mut ToolRegistry) {
        let tools = Arc::clone(&self);
        registry.register(
            "list_collections",
            "List all collections in the Qdrant database",
            json!({"type": "object", "properties": {}}),
            move |_: NoArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.list_collections().await }
            },
        );

        let tools = Arc::clone(&self);
        registry.register(
            "get_collection",
            "Get collection info",
            collection_name_schema(),
            move |args: CollectionArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.get_collection(args).await }
            },
        );

        let tools = Arc::clone(&self);
        registry.register(
            "create_collection",
            "Create a new collection",
            json!({
                "type": "object",
                "properties": {
                    "collection_name": {"type": "string", "description": "Name of the collection to create"},
                    "vector_size": {"type": "integer", "minimum": 1, "description": "Dimension of vectors to be stored"},
                    "distance": {
                        "type": "string",
                        "description": "Distance function (Cosine, Euclid, Dot)",
                        "default": "Cosine"
                    }
                },
                "required": ["collection_name", "vector_size"]
            }),
            move |args: CreateCollectionArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.create_collection(args).await }
            },
        );

        let tools = self;
        registry.register(
            "delete_collection",
            "Delete a collection",
            collection_name_schema(),
            move |args: CollectionArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.delete_collection(args).await }
            },
        );
    }
}

fn collection_name_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "collection_name": {"type": "string", "description": "Name of the collection"}
        },
        "required": ["collection_name"]
    })
}

//! Text tools: embed, store and search by meaning

use super::registry::{ToolOutput, ToolRegistry};
use super::{default_limit, normalize_ids, render};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, ToolError};
use crate::vector_db::{Distance, Filter, Payload, PointId, SearchParams, VectorPoint, VectorStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Payload key holding the original text
pub const TEXT_KEY: &str = "text";

/// Placeholder for search hits stored without text
const MISSING_TEXT: &str = "No text available";

#[derive(Debug, Deserialize)]
pub struct StoreTextArgs {
    pub text: String,
    #[serde(default)]
    pub metadata: Option<Payload>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub point_id: Option<PointId>,
}

#[derive(Debug, Deserialize)]
pub struct StoreTextsArgs {
    pub texts: Vec<String>,
    #[serde(default)]
    pub metadatas: Option<Vec<Payload>>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub point_ids: Option<Vec<PointId>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTextArgs {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub filter_json: Option<String>,
}

/// One hit of `search_similar_text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMatch {
    pub id: PointId,
    pub score: f32,
    pub text: Value,
    pub metadata: Payload,
}

pub struct TextTools {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    default_collection: String,
}

impl TextTools {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        default_collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            default_collection: default_collection.into(),
        }
    }

    fn collection<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        match requested.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_collection,
        }
    }

    /// Create the collection with the provider's dimension if it is missing
    async fn ensure_collection(&self, name: &str) -> Result<()> {
        if self.store.collection_exists(name).await? {
            debug!("Collection already exists: {}", name);
            return Ok(());
        }

        info!("Collection {} not found, creating...", name);
        self.store
            .create_collection(name, self.embedder.vector_size() as u64, Distance::Cosine)
            .await
    }

    pub async fn store_text(&self, args: StoreTextArgs) -> ToolOutput {
        info!("Generating embedding for text: {}...", preview(&args.text));
        ToolOutput::from_result("store_text", self.try_store_text(args).await)
    }

    async fn try_store_text(&self, args: StoreTextArgs) -> Result<String> {
        let collection = self.collection(&args.collection_name);

        let vector = self.embedder.embed_single(&args.text).await?;

        let mut payload = args.metadata.unwrap_or_default();
        payload.insert(TEXT_KEY.to_string(), Value::String(args.text));

        let id = match args.point_id {
            Some(id) => id.normalized()?,
            None => PointId::random(),
        };

        self.ensure_collection(collection).await?;
        self.store
            .upsert_points(
                collection,
                vec![VectorPoint {
                    id: id.clone(),
                    vector,
                    payload,
                }],
            )
            .await?;

        Ok(format!("Text stored successfully with ID: {}", id))
    }

    pub async fn store_texts(&self, args: StoreTextsArgs) -> ToolOutput {
        info!("Generating embeddings for {} texts...", args.texts.len());
        ToolOutput::from_result("store_texts", self.try_store_texts(args).await)
    }

    async fn try_store_texts(&self, args: StoreTextsArgs) -> Result<String> {
        if args.texts.is_empty() {
            return Err(ToolError::InvalidArguments("texts cannot be empty".to_string()).into());
        }

        let count = args.texts.len();
        let ids = match args.point_ids {
            Some(ids) if ids.len() != count => {
                return Err(ToolError::InvalidArguments(format!(
                    "{} texts but {} point_ids",
                    count,
                    ids.len()
                ))
                .into());
            }
            Some(ids) => normalize_ids(ids)?,
            None => (0..count).map(|_| PointId::random()).collect(),
        };

        let collection = self.collection(&args.collection_name);
        let vectors = self.embedder.embed_batch(&args.texts).await?;

        let mut metadatas = args.metadatas.unwrap_or_default().into_iter();
        let points: Vec<VectorPoint> = args
            .texts
            .into_iter()
            .zip(vectors)
            .zip(ids)
            .map(|((text, vector), id)| {
                let mut payload = metadatas.next().unwrap_or_default();
                payload.insert(TEXT_KEY.to_string(), Value::String(text));
                VectorPoint { id, vector, payload }
            })
            .collect();

        self.ensure_collection(collection).await?;
        self.store.upsert_points(collection, points).await?;

        Ok(format!("{} texts stored successfully", count))
    }

    pub async fn search_similar_text(&self, args: SearchTextArgs) -> ToolOutput {
        info!("Searching for text similar to: {}...", preview(&args.query));

        let collection = self.collection(&args.collection_name);

        let vector = match self.embedder.embed_single(&args.query).await {
            Ok(vector) => vector,
            Err(e) => return ToolOutput::from_result("search_similar_text", Err(e)),
        };

        let filter = match args.filter_json.as_deref().filter(|f| !f.is_empty()) {
            Some(text) => match Filter::from_json(text) {
                Ok(filter) => Some(filter),
                Err(e) => {
                    error!("Error parsing filter JSON: {}", e);
                    let msg = match e {
                        ToolError::InvalidFilter(msg) => msg,
                        other => other.to_string(),
                    };
                    return ToolOutput::failure(format!("Error parsing filter: {}", msg));
                }
            },
            None => None,
        };

        let params = SearchParams::new(vector, args.limit).with_filter(filter);
        let result = self
            .store
            .search(collection, params)
            .await
            .and_then(|hits| {
                let matches: Vec<TextMatch> = hits
                    .into_iter()
                    .map(|hit| {
                        let mut metadata = hit.payload;
                        let text = metadata
                            .remove(TEXT_KEY)
                            .unwrap_or_else(|| Value::String(MISSING_TEXT.to_string()));
                        TextMatch {
                            id: hit.id,
                            score: hit.score,
                            text,
                            metadata,
                        }
                    })
                    .collect();
                render(&matches)
            });

        ToolOutput::from_result("search_similar_text", result)
    }

    pub fn register(self: Arc<Self>, registry: &mut ToolRegistry) {
        let tools = Arc::clone(&self);
        registry.register(
            "store_text",
            "Store text in the vector database",
            json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string", "description": "The text to embed and store"},
                    "metadata": {"type": "object", "description": "Optional metadata to store with the text"},
                    "collection_name": {"type": "string", "description": "Collection name (uses default if not provided)"},
                    "point_id": {
                        "type": ["string", "integer"],
                        "description": "Custom ID for the point (generates UUID if not provided)"
                    }
                },
                "required": ["text"]
            }),
            move |args: StoreTextArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.store_text(args).await }
            },
        );

        let tools = Arc::clone(&self);
        registry.register(
            "search_similar_text",
            "Search for similar text",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "The text query to search for"},
                    "limit": {"type": "integer", "default": 10, "description": "Maximum number of results to return"},
                    "collection_name": {"type": "string", "description": "Collection name (uses default if not provided)"},
                    "filter_json": {"type": "string", "description": "Optional JSON filter to apply to search"}
                },
                "required": ["query"]
            }),
            move |args: SearchTextArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.search_similar_text(args).await }
            },
        );

        let tools = self;
        registry.register(
            "store_texts",
            "Bulk store texts in the vector database",
            json!({
                "type": "object",
                "properties": {
                    "texts": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of texts to embed and store"
                    },
                    "metadatas": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "Optional list of metadata objects (one per text)"
                    },
                    "collection_name": {"type": "string", "description": "Collection name (uses default if not provided)"},
                    "point_ids": {
                        "type": "array",
                        "items": {"type": ["string", "integer"]},
                        "description": "Custom IDs for the points (generates UUIDs if not provided)"
                    }
                },
                "required": ["texts"]
            }),
            move |args: StoreTextsArgs| {
                let tools = Arc::clone(&tools);
                async move { tools.store_texts(args).await }
            },
        );
    }
}

/// First 50 characters of a text, for log lines
fn preview(text: &str) -> &str {
    match text.char_indices().nth(50) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("short"), "short");

        let long = "ä".repeat(60);
        assert_eq!(preview(&long).chars().count(), 50);
    }
}

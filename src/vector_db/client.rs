//! Qdrant client implementation

use super::connection::ConnectionSettings;
use super::convert::{
    distance_name, distance_to_qdrant, filter_to_qdrant, payload_from_qdrant, payload_to_qdrant,
    point_id_from_qdrant, point_id_to_qdrant, vector_from_output,
};
use super::models::{
    CollectionInfo, CollectionSummary, Distance, Filter, OperationInfo, PointId, RetrievedPoint,
    ScoredPoint, ScrollPage, SearchParams, VectorPoint, VectorSpace,
};
use super::{CollectionStore, PointStore, SearchStore};
use crate::config::VectorDbConfig;
use crate::error::{Result, VectorDbError};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    self, vectors_config::Config, CollectionExistsRequest, CountPointsBuilder,
    CreateCollectionBuilder, DeleteCollectionBuilder, DeletePointsBuilder, GetCollectionInfoRequest,
    GetPointsBuilder, NamedVectors, PointStruct, PointsIdsList, ScrollPointsBuilder, SearchPoints,
    UpsertPointsBuilder, VectorParamsBuilder, VectorParamsMap, VectorsConfig,
};
use qdrant_client::Qdrant;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// [`VectorStore`](super::VectorStore) backed by a Qdrant server
pub struct QdrantStore {
    client: Qdrant,
    vector_name: String,
}

impl QdrantStore {
    /// Connect and verify the server answers.
    ///
    /// The liveness check lists collections once; any failure is returned
    /// to the caller, which treats it as fatal.
    pub async fn connect(config: &VectorDbConfig) -> Result<Self> {
        let settings = ConnectionSettings::resolve(config);
        let url = settings.url();

        info!("Connecting to Qdrant at {}", url);

        if !config.tls_verify {
            warn!("tls_verify=false is not supported by the gRPC client; certificates will be verified");
        }

        let client = Qdrant::from_url(&url)
            .api_key(settings.api_key.as_ref().map(|k| k.expose_secret().clone()))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorDbError::ConnectionError(e.to_string()))?;

        let store = Self::from_client(client, config.vector_name.clone());

        let collections = store
            .client
            .list_collections()
            .await
            .map_err(|e| VectorDbError::ConnectionError(format!("{}: {}", url, e)))?;

        info!(
            "Connected to Qdrant ({} collections available)",
            collections.collections.len()
        );
        Ok(store)
    }

    /// Wrap an already configured client
    pub fn from_client(client: Qdrant, vector_name: String) -> Self {
        Self { client, vector_name }
    }

    async fn create_named(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        let params = VectorParamsBuilder::new(vector_size, distance_to_qdrant(distance)).build();
        let map = HashMap::from([(self.vector_name.clone(), params)]);

        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(VectorsConfig {
                config: Some(Config::ParamsMap(VectorParamsMap { map })),
            }))
            .await?;

        info!(
            "Collection created: {} (size={}, distance={})",
            name, vector_size, distance
        );
        Ok(())
    }

    fn to_point_struct(&self, point: VectorPoint) -> PointStruct {
        let vectors = NamedVectors::default().add_vector(self.vector_name.clone(), point.vector);

        PointStruct {
            id: Some(point_id_to_qdrant(&point.id)),
            payload: payload_to_qdrant(&point.payload),
            vectors: Some(vectors.into()),
        }
    }

    fn operation_info(result: Option<qdrant::UpdateResult>) -> OperationInfo {
        match result {
            Some(update) => OperationInfo {
                operation_id: update.operation_id,
                status: qdrant::UpdateStatus::try_from(update.status)
                    .map(|s| s.as_str_name().to_string())
                    .unwrap_or_else(|_| format!("Unknown({})", update.status)),
            },
            None => OperationInfo {
                operation_id: None,
                status: "Unknown".to_string(),
            },
        }
    }
}

fn vector_spaces(config: Option<VectorsConfig>) -> Vec<VectorSpace> {
    match config.and_then(|c| c.config) {
        Some(Config::Params(params)) => vec![VectorSpace {
            name: None,
            size: params.size,
            distance: distance_name(params.distance),
        }],
        Some(Config::ParamsMap(map)) => {
            let mut spaces: Vec<_> = map
                .map
                .into_iter()
                .map(|(name, params)| VectorSpace {
                    name: Some(name),
                    size: params.size,
                    distance: distance_name(params.distance),
                })
                .collect();
            spaces.sort_by(|a, b| a.name.cmp(&b.name));
            spaces
        }
        None => Vec::new(),
    }
}

#[async_trait]
impl CollectionStore for QdrantStore {
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let response = self.client.list_collections().await?;

        Ok(response
            .collections
            .into_iter()
            .map(|c| CollectionSummary { name: c.name })
            .collect())
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo> {
        debug!("Fetching collection info: {}", name);

        let response = self
            .client
            .collection_info(GetCollectionInfoRequest {
                collection_name: name.to_string(),
            })
            .await?;

        let info = response
            .result
            .ok_or_else(|| VectorDbError::CollectionNotFound(name.to_string()))?;

        let status = qdrant::CollectionStatus::try_from(info.status)
            .map(|s| s.as_str_name().to_string())
            .unwrap_or_else(|_| format!("Unknown({})", info.status));

        let vectors = vector_spaces(
            info.config
                .and_then(|c| c.params)
                .and_then(|p| p.vectors_config),
        );

        Ok(CollectionInfo {
            name: name.to_string(),
            status,
            points_count: info.points_count,
            vectors,
        })
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let exists = self
            .client
            .collection_exists(CollectionExistsRequest {
                collection_name: name.to_string(),
            })
            .await?;
        Ok(exists)
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        if let Err(e) = self.create_named(name, vector_size, distance).await {
            // A concurrent creator won the race
            if self.collection_exists(name).await? {
                debug!("Collection {} already exists: {}", name, e);
                return Ok(());
            }
            return Err(e);
        }
        Ok(())
    }

    async fn recreate_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        if self.collection_exists(name).await? {
            info!("Replacing existing collection: {}", name);
            self.client
                .delete_collection(DeleteCollectionBuilder::new(name))
                .await?;
        }

        self.create_named(name, vector_size, distance).await
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        debug!("Deleting collection: {}", name);

        let response = self
            .client
            .delete_collection(DeleteCollectionBuilder::new(name))
            .await?;

        if !response.result {
            return Err(VectorDbError::CollectionNotFound(name.to_string()).into());
        }

        info!("Collection deleted: {}", name);
        Ok(())
    }
}

#[async_trait]
impl PointStore for QdrantStore {
    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<OperationInfo> {
        debug!("Upserting {} points into collection: {}", points.len(), collection);

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| self.to_point_struct(point))
            .collect();

        let response = self
            .client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await?;

        Ok(Self::operation_info(response.result))
    }

    async fn get_points(
        &self,
        collection: &str,
        ids: &[PointId],
        with_vectors: bool,
    ) -> Result<Vec<RetrievedPoint>> {
        debug!("Getting {} points from collection: {}", ids.len(), collection);

        let point_ids: Vec<qdrant::PointId> = ids.iter().map(point_id_to_qdrant).collect();

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(collection, point_ids)
                    .with_payload(true)
                    .with_vectors(with_vectors),
            )
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                Ok(RetrievedPoint {
                    id: point_id_from_qdrant(point.id)?,
                    payload: payload_from_qdrant(&point.payload),
                    vector: if with_vectors {
                        vector_from_output(point.vectors, &self.vector_name)
                    } else {
                        None
                    },
                })
            })
            .collect()
    }

    async fn delete_points(&self, collection: &str, ids: &[PointId]) -> Result<OperationInfo> {
        debug!("Deleting {} points from collection: {}", ids.len(), collection);

        let point_ids = PointsIdsList {
            ids: ids.iter().map(point_id_to_qdrant).collect(),
        };

        let response = self
            .client
            .delete_points(DeletePointsBuilder::new(collection).points(point_ids).wait(true))
            .await?;

        Ok(Self::operation_info(response.result))
    }

    async fn count_points(&self, collection: &str) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}

#[async_trait]
impl SearchStore for QdrantStore {
    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<ScoredPoint>> {
        debug!("Searching in collection: {} with limit: {}", collection, params.limit);

        let with_vector = params.with_vector;
        let request = SearchPoints {
            collection_name: collection.to_string(),
            vector: params.vector,
            limit: params.limit,
            filter: params.filter.as_ref().map(filter_to_qdrant),
            with_payload: Some(params.with_payload.into()),
            with_vectors: Some(with_vector.into()),
            vector_name: Some(self.vector_name.clone()),
            ..Default::default()
        };

        let response = self.client.search_points(request).await?;

        let results = response
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredPoint {
                    id: point_id_from_qdrant(point.id)?,
                    score: point.score,
                    payload: payload_from_qdrant(&point.payload),
                    vector: if with_vector {
                        vector_from_output(point.vectors, &self.vector_name)
                    } else {
                        None
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Found {} results", results.len());
        Ok(results)
    }

    async fn scroll(&self, collection: &str, filter: Filter, limit: u32) -> Result<ScrollPage> {
        debug!("Scrolling collection: {} with limit: {}", collection, limit);

        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(collection)
                    .filter(filter_to_qdrant(&filter))
                    .limit(limit)
                    .with_payload(true)
                    .with_vectors(false),
            )
            .await?;

        let points = response
            .result
            .into_iter()
            .map(|point| {
                Ok(RetrievedPoint {
                    id: point_id_from_qdrant(point.id)?,
                    payload: payload_from_qdrant(&point.payload),
                    vector: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let next_page_offset = match response.next_page_offset {
            Some(offset) => Some(point_id_from_qdrant(Some(offset))?),
            None => None,
        };

        Ok(ScrollPage {
            points,
            next_page_offset,
        })
    }
}

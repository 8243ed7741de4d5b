//! Test doubles: an in-memory vector store and a deterministic embedder

#![allow(dead_code)]

use async_trait::async_trait;
use indexmap::IndexMap;
use qdrant_mcp_server::embedding::EmbeddingProvider;
use qdrant_mcp_server::error::{EmbeddingError, Result, ServerError, VectorDbError};
use qdrant_mcp_server::vector_db::models::{Match, MatchValue, MatchValues};
use qdrant_mcp_server::vector_db::{
    CollectionInfo, CollectionStore, CollectionSummary, Condition, Distance, Filter,
    OperationInfo, Payload, PointId, PointStore, RetrievedPoint, ScoredPoint, ScrollPage,
    SearchParams, SearchStore, VectorPoint, VectorSpace,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const VECTOR_NAME: &str = "default";

struct MemCollection {
    vector_size: u64,
    distance: Distance,
    points: IndexMap<PointId, (Vec<f32>, Payload)>,
}

/// Vector store kept in process memory. Filters are evaluated the way
/// Qdrant evaluates them for the supported conditions.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, MemCollection>>,
    calls: AtomicUsize,
    operations: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector_of(&self, collection: &str, id: &PointId) -> Option<Vec<f32>> {
        let collections = self.collections.lock().unwrap();
        collections
            .get(collection)
            .and_then(|c| c.points.get(id))
            .map(|(vector, _)| vector.clone())
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn completed(&self) -> OperationInfo {
        OperationInfo {
            operation_id: Some(self.operations.fetch_add(1, Ordering::SeqCst)),
            status: "Completed".to_string(),
        }
    }

    fn with_collection<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MemCollection) -> Result<T>,
    ) -> Result<T> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| VectorDbError::CollectionNotFound(name.to_string()))?;
        f(collection)
    }
}

#[async_trait]
impl CollectionStore for InMemoryStore {
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        self.record();
        let collections = self.collections.lock().unwrap();
        let mut names: Vec<_> = collections.keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(|name| CollectionSummary { name }).collect())
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo> {
        self.record();
        self.with_collection(name, |c| {
            Ok(CollectionInfo {
                name: name.to_string(),
                status: "Green".to_string(),
                points_count: Some(c.points.len() as u64),
                vectors: vec![VectorSpace {
                    name: Some(VECTOR_NAME.to_string()),
                    size: c.vector_size,
                    distance: c.distance.to_string(),
                }],
            })
        })
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.record();
        Ok(self.collections.lock().unwrap().contains_key(name))
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        self.record();
        self.collections
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert_with(|| MemCollection {
                vector_size,
                distance,
                points: IndexMap::new(),
            });
        Ok(())
    }

    async fn recreate_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        self.record();
        self.collections.lock().unwrap().insert(
            name.to_string(),
            MemCollection {
                vector_size,
                distance,
                points: IndexMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.record();
        self.collections
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VectorDbError::CollectionNotFound(name.to_string()).into())
    }
}

#[async_trait]
impl PointStore for InMemoryStore {
    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<OperationInfo> {
        self.record();
        self.with_collection(collection, |c| {
            if let Some(bad) = points.iter().find(|p| p.vector.len() as u64 != c.vector_size) {
                return Err(ServerError::Internal(format!(
                    "Wrong input: Vector dimension error: expected dim: {}, got {}",
                    c.vector_size,
                    bad.vector.len()
                )));
            }
            for point in points {
                c.points.insert(point.id, (point.vector, point.payload));
            }
            Ok(())
        })?;
        Ok(self.completed())
    }

    async fn get_points(
        &self,
        collection: &str,
        ids: &[PointId],
        with_vectors: bool,
    ) -> Result<Vec<RetrievedPoint>> {
        self.record();
        self.with_collection(collection, |c| {
            Ok(ids
                .iter()
                .filter_map(|id| {
                    c.points.get(id).map(|(vector, payload)| RetrievedPoint {
                        id: id.clone(),
                        payload: payload.clone(),
                        vector: with_vectors.then(|| vector.clone()),
                    })
                })
                .collect())
        })
    }

    async fn delete_points(&self, collection: &str, ids: &[PointId]) -> Result<OperationInfo> {
        self.record();
        self.with_collection(collection, |c| {
            for id in ids {
                c.points.shift_remove(id);
            }
            Ok(())
        })?;
        Ok(self.completed())
    }

    async fn count_points(&self, collection: &str) -> Result<u64> {
        self.record();
        self.with_collection(collection, |c| Ok(c.points.len() as u64))
    }
}

#[async_trait]
impl SearchStore for InMemoryStore {
    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<ScoredPoint>> {
        self.record();
        self.with_collection(collection, |c| {
            if params.vector.len() as u64 != c.vector_size {
                return Err(ServerError::Internal(format!(
                    "Wrong input: Vector dimension error: expected dim: {}, got {}",
                    c.vector_size,
                    params.vector.len()
                )));
            }

            let mut hits: Vec<ScoredPoint> = c
                .points
                .iter()
                .filter(|(id, (_, payload))| {
                    params
                        .filter
                        .as_ref()
                        .map_or(true, |f| filter_matches(f, id, payload))
                })
                .map(|(id, (vector, payload))| ScoredPoint {
                    id: id.clone(),
                    score: score(c.distance, &params.vector, vector),
                    payload: if params.with_payload {
                        payload.clone()
                    } else {
                        Payload::new()
                    },
                    vector: params.with_vector.then(|| vector.clone()),
                })
                .collect();

            hits.sort_by(|a, b| b.score.total_cmp(&a.score));
            hits.truncate(params.limit as usize);
            Ok(hits)
        })
    }

    async fn scroll(&self, collection: &str, filter: Filter, limit: u32) -> Result<ScrollPage> {
        self.record();
        self.with_collection(collection, |c| {
            let mut matching = c
                .points
                .iter()
                .filter(|(id, (_, payload))| filter_matches(&filter, id, payload));

            let points: Vec<RetrievedPoint> = matching
                .by_ref()
                .take(limit as usize)
                .map(|(id, (_, payload))| RetrievedPoint {
                    id: id.clone(),
                    payload: payload.clone(),
                    vector: None,
                })
                .collect();

            let next_page_offset = matching.next().map(|(id, _)| id.clone());
            Ok(ScrollPage {
                points,
                next_page_offset,
            })
        })
    }
}

/// In-memory store that yields to the scheduler before every operation,
/// with a multi-step recreate like a remote server's, so concurrent tool
/// calls interleave between store round trips
#[derive(Default)]
pub struct YieldingStore {
    inner: InMemoryStore,
}

impl YieldingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for YieldingStore {
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        tokio::task::yield_now().await;
        self.inner.list_collections().await
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo> {
        tokio::task::yield_now().await;
        self.inner.collection_info(name).await
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        tokio::task::yield_now().await;
        self.inner.collection_exists(name).await
    }

    async fn create_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.create_collection(name, vector_size, distance).await
    }

    async fn recreate_collection(&self, name: &str, vector_size: u64, distance: Distance) -> Result<()> {
        if self.collection_exists(name).await? {
            self.delete_collection(name).await?;
        }
        self.create_collection(name, vector_size, distance).await
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.delete_collection(name).await
    }
}

#[async_trait]
impl PointStore for YieldingStore {
    async fn upsert_points(&self, collection: &str, points: Vec<VectorPoint>) -> Result<OperationInfo> {
        tokio::task::yield_now().await;
        self.inner.upsert_points(collection, points).await
    }

    async fn get_points(
        &self,
        collection: &str,
        ids: &[PointId],
        with_vectors: bool,
    ) -> Result<Vec<RetrievedPoint>> {
        tokio::task::yield_now().await;
        self.inner.get_points(collection, ids, with_vectors).await
    }

    async fn delete_points(&self, collection: &str, ids: &[PointId]) -> Result<OperationInfo> {
        tokio::task::yield_now().await;
        self.inner.delete_points(collection, ids).await
    }

    async fn count_points(&self, collection: &str) -> Result<u64> {
        tokio::task::yield_now().await;
        self.inner.count_points(collection).await
    }
}

#[async_trait]
impl SearchStore for YieldingStore {
    async fn search(&self, collection: &str, params: SearchParams) -> Result<Vec<ScoredPoint>> {
        tokio::task::yield_now().await;
        self.inner.search(collection, params).await
    }

    async fn scroll(&self, collection: &str, filter: Filter, limit: u32) -> Result<ScrollPage> {
        tokio::task::yield_now().await;
        self.inner.scroll(collection, filter, limit).await
    }
}

fn score(distance: Distance, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match distance {
        Distance::Dot => dot,
        Distance::Cosine => {
            let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm_a == 0.0 || norm_b == 0.0 {
                0.0
            } else {
                dot / (norm_a * norm_b)
            }
        }
        Distance::Euclidean => -a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}

pub fn filter_matches(filter: &Filter, id: &PointId, payload: &Payload) -> bool {
    filter.must.iter().all(|c| condition_matches(c, id, payload))
        && (filter.should.is_empty() || filter.should.iter().any(|c| condition_matches(c, id, payload)))
        && !filter.must_not.iter().any(|c| condition_matches(c, id, payload))
}

/// Scalar values of a field; arrays match element-wise
fn field_values<'a>(payload: &'a Payload, key: &str) -> Vec<&'a Value> {
    match payload.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(value) => vec![value],
        None => Vec::new(),
    }
}

fn scalar_eq(value: &Value, expected: &MatchValue) -> bool {
    match expected {
        MatchValue::Bool(b) => value.as_bool() == Some(*b),
        MatchValue::Integer(i) => value.as_i64() == Some(*i),
        MatchValue::Keyword(s) => value.as_str() == Some(s.as_str()),
    }
}

fn in_list(value: &Value, list: &MatchValues) -> bool {
    match list {
        MatchValues::Integers(ints) => value.as_i64().is_some_and(|v| ints.contains(&v)),
        MatchValues::Keywords(words) => value
            .as_str()
            .is_some_and(|v| words.iter().any(|w| w == v)),
    }
}

fn condition_matches(condition: &Condition, id: &PointId, payload: &Payload) -> bool {
    match condition {
        Condition::Match(m) => {
            let values = field_values(payload, &m.key);
            match &m.r#match {
                Match::Value(v) => values.iter().any(|value| scalar_eq(value, &v.value)),
                Match::Any(any) => values.iter().any(|value| in_list(value, &any.any)),
                Match::Except(except) => {
                    !values.is_empty() && values.iter().any(|value| !in_list(value, &except.except))
                }
            }
        }
        Condition::Range(r) => field_values(payload, &r.key).iter().any(|value| {
            value.as_f64().is_some_and(|v| {
                r.range.gt.map_or(true, |b| v > b)
                    && r.range.gte.map_or(true, |b| v >= b)
                    && r.range.lt.map_or(true, |b| v < b)
                    && r.range.lte.map_or(true, |b| v <= b)
            })
        }),
        Condition::HasId(h) => h.has_id.contains(id),
        Condition::IsEmpty(e) => match payload.get(&e.is_empty.key) {
            None | Some(Value::Null) => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        },
        Condition::IsNull(n) => matches!(payload.get(&n.is_null.key), Some(Value::Null)),
        Condition::Nested(inner) => filter_matches(inner, id, payload),
    }
}

/// Hashing bag-of-words embedder: texts sharing words get similar vectors
pub struct BagOfWordsEmbedder {
    size: usize,
    calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.size];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = fnv1a(&word.to_lowercase()) as usize % self.size;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x100000001b3)
    })
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if texts.is_empty() || texts.iter().any(|t| t.is_empty()) {
            return Err(EmbeddingError::InvalidInput("Text cannot be empty".to_string()).into());
        }
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn vector_size(&self) -> usize {
        self.size
    }

    fn model_name(&self) -> &str {
        "bag-of-words"
    }
}

//! Data models for vector database operations

use crate::error::{ToolError, VectorDbError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Open key-value metadata attached to a point
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Point identifier: an unsigned integer or a UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl PointId {
    /// Fresh random identifier
    pub fn random() -> Self {
        PointId::Uuid(Uuid::new_v4().to_string())
    }

    /// Validate a caller-supplied id. Digit strings become numeric ids and
    /// UUIDs are brought to their hyphenated lowercase form.
    pub fn normalized(self) -> Result<Self, VectorDbError> {
        match self {
            PointId::Num(n) => Ok(PointId::Num(n)),
            PointId::Uuid(raw) => raw.parse(),
        }
    }
}

impl FromStr for PointId {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .map(PointId::Num)
                .map_err(|e| VectorDbError::InvalidIdFormat(format!("{}: {}", s, e)));
        }

        Uuid::parse_str(trimmed)
            .map(|uuid| PointId::Uuid(uuid.hyphenated().to_string()))
            .map_err(|_| {
                VectorDbError::InvalidIdFormat(format!(
                    "'{}' is neither an unsigned integer nor a UUID",
                    s
                ))
            })
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{}", n),
            PointId::Uuid(s) => f.write_str(s),
        }
    }
}

/// Distance metrics supported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Distance {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

impl FromStr for Distance {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            "euclid" | "euclidean" => Ok(Distance::Euclidean),
            "dot" => Ok(Distance::Dot),
            _ => Err(VectorDbError::InvalidDistance(format!(
                "'{}' (expected Cosine, Euclidean or Dot)",
                s
            ))),
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distance::Cosine => "Cosine",
            Distance::Euclidean => "Euclidean",
            Distance::Dot => "Dot",
        };
        f.write_str(name)
    }
}

/// Entry of the collection list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSummary {
    pub name: String,
}

/// Descriptor of a single collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub status: String,
    pub points_count: Option<u64>,
    pub vectors: Vec<VectorSpace>,
}

/// Configuration of one vector space inside a collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorSpace {
    /// `None` for the unnamed vector of a single-vector collection
    pub name: Option<String>,
    pub size: u64,
    pub distance: String,
}

/// Point to be stored in vector database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: PointId,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

/// Point returned by retrieval or scroll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPoint {
    pub id: PointId,
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// Search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// One page of a filtered scroll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollPage {
    pub points: Vec<RetrievedPoint>,
    pub next_page_offset: Option<PointId>,
}

/// Outcome of a write acknowledged by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationInfo {
    pub operation_id: Option<u64>,
    pub status: String,
}

/// Search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query vector
    pub vector: Vec<f32>,

    /// Maximum number of results
    pub limit: u64,

    /// Payload filter restricting the candidates
    pub filter: Option<Filter>,

    /// Include payload in results
    pub with_payload: bool,

    /// Include vectors in results
    pub with_vector: bool,
}

impl SearchParams {
    pub fn new(vector: Vec<f32>, limit: u64) -> Self {
        Self {
            vector,
            limit,
            filter: None,
            with_payload: true,
            with_vector: false,
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_vector(mut self, with_vector: bool) -> Self {
        self.with_vector = with_vector;
        self
    }
}

/// Boolean payload filter in Qdrant's JSON form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    /// Must match all conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Condition>,

    /// Must match at least one condition
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Condition>,

    /// Must not match any condition
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Condition>,
}

impl Filter {
    /// Parse a filter from its JSON text
    pub fn from_json(text: &str) -> Result<Self, ToolError> {
        serde_json::from_str(text).map_err(|e| ToolError::InvalidFilter(e.to_string()))
    }

    pub fn must(mut self, condition: Condition) -> Self {
        self.must.push(condition);
        self
    }
}

/// Individual filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Match(MatchCondition),
    Range(RangeCondition),
    HasId(HasIdCondition),
    IsEmpty(IsEmptyCondition),
    IsNull(IsNullCondition),
    Nested(Filter),
}

impl Condition {
    /// Equality on a payload field
    pub fn matches(key: impl Into<String>, value: impl Into<MatchValue>) -> Self {
        Condition::Match(MatchCondition {
            key: key.into(),
            r#match: Match::Value(ValueMatch { value: value.into() }),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub r#match: Match,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Match {
    Value(ValueMatch),
    Any(AnyMatch),
    Except(ExceptMatch),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueMatch {
    pub value: MatchValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnyMatch {
    pub any: MatchValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptMatch {
    pub except: MatchValues,
}

/// Scalar accepted by an equality match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchValue {
    Bool(bool),
    Integer(i64),
    Keyword(String),
}

impl From<&str> for MatchValue {
    fn from(value: &str) -> Self {
        MatchValue::Keyword(value.to_string())
    }
}

impl From<String> for MatchValue {
    fn from(value: String) -> Self {
        MatchValue::Keyword(value)
    }
}

impl From<i64> for MatchValue {
    fn from(value: i64) -> Self {
        MatchValue::Integer(value)
    }
}

impl From<bool> for MatchValue {
    fn from(value: bool) -> Self {
        MatchValue::Bool(value)
    }
}

/// Homogeneous value list for `any` / `except`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchValues {
    Integers(Vec<i64>),
    Keywords(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeCondition {
    pub key: String,
    pub range: Range,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasIdCondition {
    pub has_id: Vec<PointId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsEmptyCondition {
    pub is_empty: FieldRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsNullCondition {
    pub is_null: FieldRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRef {
    pub key: String,
}

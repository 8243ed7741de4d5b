//! Conversions between the crate's models and Qdrant's protobuf types

use super::models::{
    Condition, Distance, Filter, Match, MatchValue, MatchValues, Payload, PointId, Range,
};
use crate::error::{Result, VectorDbError};
use qdrant_client::qdrant::{
    self, condition::ConditionOneOf, point_id::PointIdOptions, r#match::MatchValue as QdrantMatch,
    value::Kind, vectors_output::VectorsOptions, ListValue, RepeatedIntegers, RepeatedStrings,
    Struct,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Convert a JSON value into a Qdrant payload value
pub fn json_to_qdrant_value(value: &JsonValue) -> qdrant::Value {
    let kind = match value {
        JsonValue::Null => Kind::NullValue(0),
        JsonValue::Bool(b) => Kind::BoolValue(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        JsonValue::String(s) => Kind::StringValue(s.clone()),
        JsonValue::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_qdrant_value).collect(),
        }),
        JsonValue::Object(map) => Kind::StructValue(Struct {
            fields: map
                .iter()
                .map(|(k, v)| (k.clone(), json_to_qdrant_value(v)))
                .collect(),
        }),
    };

    qdrant::Value { kind: Some(kind) }
}

/// Convert a Qdrant payload value back to JSON
pub fn qdrant_value_to_json(value: &qdrant::Value) -> JsonValue {
    match &value.kind {
        Some(Kind::NullValue(_)) | None => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(*b),
        Some(Kind::IntegerValue(i)) => JsonValue::Number((*i).into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(*d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.iter().map(qdrant_value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => JsonValue::Object(
            s.fields
                .iter()
                .map(|(k, v)| (k.clone(), qdrant_value_to_json(v)))
                .collect(),
        ),
    }
}

pub fn payload_to_qdrant(payload: &Payload) -> HashMap<String, qdrant::Value> {
    payload
        .iter()
        .map(|(k, v)| (k.clone(), json_to_qdrant_value(v)))
        .collect()
}

pub fn payload_from_qdrant(payload: &HashMap<String, qdrant::Value>) -> Payload {
    payload
        .iter()
        .map(|(k, v)| (k.clone(), qdrant_value_to_json(v)))
        .collect()
}

pub fn point_id_to_qdrant(id: &PointId) -> qdrant::PointId {
    match id {
        PointId::Num(n) => qdrant::PointId::from(*n),
        PointId::Uuid(s) => qdrant::PointId::from(s.clone()),
    }
}

pub fn point_id_from_qdrant(id: Option<qdrant::PointId>) -> Result<PointId> {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Num(n)) => Ok(PointId::Num(n)),
        Some(PointIdOptions::Uuid(s)) => Ok(PointId::Uuid(s)),
        None => Err(VectorDbError::InvalidIdFormat("point without id".to_string()).into()),
    }
}

pub fn distance_to_qdrant(distance: Distance) -> qdrant::Distance {
    match distance {
        Distance::Cosine => qdrant::Distance::Cosine,
        Distance::Euclidean => qdrant::Distance::Euclid,
        Distance::Dot => qdrant::Distance::Dot,
    }
}

/// Human readable name of a protobuf distance discriminant
pub fn distance_name(raw: i32) -> String {
    qdrant::Distance::try_from(raw)
        .map(|d| d.as_str_name().to_string())
        .unwrap_or_else(|_| format!("Unknown({})", raw))
}

/// Pick the vector out of a retrieval result.
///
/// Single-vector points carry it directly; named-vector points are looked
/// up by `vector_name`, falling back to the only vector present.
#[allow(deprecated)]
pub fn vector_from_output(
    vectors: Option<qdrant::VectorsOutput>,
    vector_name: &str,
) -> Option<Vec<f32>> {
    match vectors?.vectors_options? {
        VectorsOptions::Vector(v) => Some(v.data),
        VectorsOptions::Vectors(named) => {
            let mut map = named.vectors;
            let single = if map.len() == 1 {
                map.keys().next().cloned()
            } else {
                None
            };
            map.remove(vector_name)
                .or_else(|| single.and_then(|key| map.remove(&key)))
                .map(|v| v.data)
        }
    }
}

pub fn filter_to_qdrant(filter: &Filter) -> qdrant::Filter {
    qdrant::Filter {
        must: filter.must.iter().map(condition_to_qdrant).collect(),
        should: filter.should.iter().map(condition_to_qdrant).collect(),
        must_not: filter.must_not.iter().map(condition_to_qdrant).collect(),
        ..Default::default()
    }
}

fn condition_to_qdrant(condition: &Condition) -> qdrant::Condition {
    match condition {
        Condition::Match(m) => {
            let value = match &m.r#match {
                Match::Value(v) => match &v.value {
                    MatchValue::Bool(b) => QdrantMatch::Boolean(*b),
                    MatchValue::Integer(i) => QdrantMatch::Integer(*i),
                    MatchValue::Keyword(s) => QdrantMatch::Keyword(s.clone()),
                },
                Match::Any(any) => match &any.any {
                    MatchValues::Integers(integers) => QdrantMatch::Integers(RepeatedIntegers {
                        integers: integers.clone(),
                    }),
                    MatchValues::Keywords(strings) => QdrantMatch::Keywords(RepeatedStrings {
                        strings: strings.clone(),
                    }),
                },
                Match::Except(except) => match &except.except {
                    MatchValues::Integers(integers) => {
                        QdrantMatch::ExceptIntegers(RepeatedIntegers {
                            integers: integers.clone(),
                        })
                    }
                    MatchValues::Keywords(strings) => QdrantMatch::ExceptKeywords(RepeatedStrings {
                        strings: strings.clone(),
                    }),
                },
            };
            qdrant::Condition::matches(m.key.clone(), value)
        }
        Condition::Range(r) => qdrant::Condition::range(r.key.clone(), range_to_qdrant(&r.range)),
        Condition::HasId(h) => {
            qdrant::Condition::has_id(h.has_id.iter().map(point_id_to_qdrant))
        }
        Condition::IsEmpty(e) => qdrant::Condition::is_empty(e.is_empty.key.clone()),
        Condition::IsNull(n) => qdrant::Condition::is_null(n.is_null.key.clone()),
        Condition::Nested(inner) => qdrant::Condition {
            condition_one_of: Some(ConditionOneOf::Filter(filter_to_qdrant(inner))),
        },
    }
}

fn range_to_qdrant(range: &Range) -> qdrant::Range {
    qdrant::Range {
        gt: range.gt,
        gte: range.gte,
        lt: range.lt,
        lte: range.lte,
    }
}

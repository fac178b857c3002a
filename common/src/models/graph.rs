//! Graph query models.
//!
//! Contains the parameter mapping submitted alongside a query template and
//! the result shape returned by the graph database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single query parameter value.
///
/// Limited to the kinds the graph database's JSON protocol can carry.
/// Serialized untagged, so `ParamValue::Integer(3)` goes over the wire as `3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Boolean(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(v: BTreeMap<String, ParamValue>) -> Self {
        ParamValue::Map(v)
    }
}

/// Request-scoped parameter mapping, name to value.
///
/// Substitution happens inside the database engine; this type only carries
/// the values. The default is the empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    /// Creates an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a graph query execution.
///
/// Mirrors one statement result of the database reply. Fields the service does
/// not read itself (`stats`, `plan`, ...) are kept in `extra` and serialized
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GraphQueryResult {
    /// Names of the returned columns, in `RETURN` order.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Result records.
    #[serde(default)]
    pub data: Vec<GraphRow>,

    /// Server notifications (warnings, deprecations) raised by the statement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub notifications: Vec<serde_json::Value>,

    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GraphRow {
    /// Column values (nodes and relationships arrive as property maps).
    #[schema(value_type = Vec<Object>)]
    pub row: Vec<serde_json::Value>,

    /// Remaining record fields such as `meta` and `graph`.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GraphQueryResult {
    /// Creates an empty query result.
    pub fn empty() -> Self {
        Self {
            columns: vec![],
            data: vec![],
            notifications: vec![],
            extra: serde_json::Map::new(),
        }
    }

    /// Number of records returned.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

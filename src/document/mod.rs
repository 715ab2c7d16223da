//! The `.pear` document envelope.
//!
//! A document is a tagged union: `{"type": "pool" | "agent" | "collection", "data": {...}}`.
//! The payload is kept as raw JSON so every synthesized node can carry an untouched
//! copy of its subtree; the typed views in [`model`] are read-only helpers on top.

pub mod model;

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;

pub use model::{ModelBinding, StoreType};

/// The discriminating tag of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pool,
    Agent,
    Collection,
    Unknown(String),
}

impl DocumentKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pool" => DocumentKind::Pool,
            "agent" => DocumentKind::Agent,
            "collection" => DocumentKind::Collection,
            other => DocumentKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentKind::Pool => "pool",
            DocumentKind::Agent => "agent",
            DocumentKind::Collection => "collection",
            DocumentKind::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `.pear` document.
///
/// Unrecognised top-level keys are preserved in `extra` so a document survives a
/// load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub tag: String,
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(tag: impl Into<String>, data: Value) -> Self {
        Self {
            tag: tag.into(),
            data,
            extra: Map::new(),
        }
    }

    /// Parses and validates a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DocumentError::JsonParse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validates that `value` carries a string `type` and a `data` payload.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut object) = value else {
            return Err(DocumentError::JsonParse(
                "top-level value is not an object".to_string(),
            ));
        };

        let tag = match object.remove("type") {
            Some(Value::String(tag)) => tag,
            Some(Value::Null) | None => return Err(DocumentError::MissingField("type")),
            Some(other) => return Err(DocumentError::InvalidTag(other.to_string())),
        };
        let data = match object.remove("data") {
            Some(Value::Null) | None => return Err(DocumentError::MissingField("data")),
            Some(data) => data,
        };

        Ok(Self {
            tag,
            data,
            extra: object,
        })
    }

    /// Load a document from a `.pear` (or `.json`) file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_tag(&self.tag)
    }

    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert("type".to_string(), Value::String(self.tag.clone()));
        object.insert("data".to_string(), self.data.clone());
        Value::Object(object)
    }
}

/// Returns the `name` field of a payload, if it has one.
pub fn payload_name(payload: &Value) -> Option<&str> {
    payload.get("name").and_then(Value::as_str)
}

/// Returns the array stored under `key`, treating a missing or non-array value as empty.
pub(crate) fn payload_list<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Returns the subtree under `key` unless it is absent or `null`.
pub(crate) fn payload_child<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| !v.is_null())
}

//! EventPath parsing and formatting.
//!
//! Grammar (simple, renderer-agnostic): dot-separated selectors into a
//! native event payload, e.g.
//!   "contentOffset.x"      -> segments=["contentOffset", "x"]
//!   "layout.size.0"        -> numeric segments index into arrays
//!
//! EventPath is intentionally string-based; event mappings pair it with a
//! graph node so a view event can drive animated values without host code
//! inspecting the payload shape.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::value::Value;

/// Errors produced while parsing an event payload path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty event path")]
    Empty,
    #[error("empty segment in event path `{0}`")]
    EmptySegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventPath {
    /// Ordered payload selectors (may not be empty)
    pub segments: Vec<String>,
}

impl EventPath {
    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<&str> = s.split('.').collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(PathError::EmptySegment(s.to_string()));
        }
        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
        })
    }

    /// Select the addressed payload field and convert it into a [`Value`].
    ///
    /// Numbers become `Float`, booleans `Bool`, strings `Text`, and numeric
    /// arrays `Vector`. Returns `None` when the payload does not contain the
    /// addressed field or it has a shape no animated value can carry.
    pub fn lookup(&self, payload: &JsonValue) -> Option<Value> {
        let mut cursor = payload;
        for seg in &self.segments {
            cursor = match cursor {
                JsonValue::Object(map) => map.get(seg)?,
                JsonValue::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        match cursor {
            JsonValue::Number(n) => Some(Value::Float(n.as_f64()? as f32)),
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::String(s) => Some(Value::Text(s.clone())),
            JsonValue::Array(items) => {
                let floats: Option<Vec<f32>> = items
                    .iter()
                    .map(|item| item.as_f64().map(|f| f as f32))
                    .collect();
                floats.map(Value::Vector)
            }
            _ => None,
        }
    }
}

impl fmt::Display for EventPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for EventPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EventPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventPath::parse(&s).map_err(de::Error::custom)
    }
}

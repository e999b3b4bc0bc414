//! Value: runtime prop/style values delivered to views.
//! All numeric components use f32.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered map of resolved property or style values. Insertion order is
/// preserved so snapshots and diffs are deterministic.
pub type ValueMap = IndexMap<String, Value>;

/// Lightweight kind enum for pattern-matching and quick dispatch without
/// touching the payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    ColorRgba,
    Vector,
    Text,
    Transform,
    Map,
}

/// One entry of a transform list (`rotate`, `scale`, `translateX`, ...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransformOp {
    pub op: String,
    pub amount: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Boolean (step)
    Bool(bool),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// 4D vector
    Vec4([f32; 4]),

    /// RGBA color (linear by convention)
    ColorRgba([f32; 4]),

    /// Generic, variable-length numeric vector
    Vector(Vec<f32>),

    /// Text / string
    Text(String),

    /// Ordered transform-op list as applied to a view's style
    Transform(Vec<TransformOp>),

    /// Nested value object (resolved style composites)
    Map(ValueMap),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Vector(_) => ValueKind::Vector,
            Value::Text(_) => ValueKind::Text,
            Value::Transform(_) => ValueKind::Transform,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Convenience constructor for the common scalar case.
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    /// Scalar view of this value, if it has one.
    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Nested map view of this value, if it has one.
    #[inline]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

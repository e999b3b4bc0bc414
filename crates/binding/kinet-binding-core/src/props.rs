//! Property bags and the tagged prop-value union.
//!
//! Classification happens once, at ingestion: every entry becomes a
//! [`PropValue`] variant and the `style` key is normalized into exactly one
//! style composite node, even when the caller supplied a plain value map.
//! Later diffing and attachment never re-inspect raw caller data.

use indexmap::IndexMap;
use kinet_api_core::Value;
use kinet_graph_core::{GraphRegistry, NodeTag, StyleEntry};

use crate::event::AnimatedEvent;

/// The property name that always carries a style composite.
pub const STYLE_KEY: &str = "style";

/// Caller-supplied property, before normalization.
#[derive(Clone, Debug)]
pub enum RawProp {
    /// Plain immutable value.
    Static(Value),
    /// Value driven by a graph node.
    Node(NodeTag),
    /// Style entries to be materialized as a single composite node.
    Style(Vec<StyleEntry>),
    /// Native event binding.
    Event(AnimatedEvent),
}

/// A property value, classified at ingestion.
#[derive(Clone, Debug)]
pub enum PropValue {
    /// Plain immutable value passed through to rendering.
    Static(Value),
    /// Value driven by a graph node.
    Node(NodeTag),
    /// Style composite materialized as a single graph node, owned by the bag.
    Style(NodeTag),
    /// Native event binding.
    Event(AnimatedEvent),
}

impl PropValue {
    /// Tag of the graph node backing this value, when there is one.
    pub fn node(&self) -> Option<NodeTag> {
        match self {
            PropValue::Node(tag) | PropValue::Style(tag) => Some(*tag),
            _ => None,
        }
    }

    /// Whether this entry participates in the value classification
    /// (attached to the graph through the props composite).
    pub fn is_value_binding(&self) -> bool {
        matches!(self, PropValue::Node(_) | PropValue::Style(_))
    }

    pub fn is_event_binding(&self) -> bool {
        matches!(self, PropValue::Event(_))
    }
}

/// Ordered property bag. Replaced wholesale on every prop update; never
/// mutated field by field.
#[derive(Clone, Debug, Default)]
pub struct PropertyBag {
    entries: IndexMap<String, PropValue>,
}

impl PropertyBag {
    /// Normalize raw caller props into a bag. The `style` key always lands
    /// as one style composite: plain maps become `Fixed` entries, entry
    /// lists are materialized, and a bare node is adopted as the composite.
    pub fn ingest(graph: &mut GraphRegistry, raw: IndexMap<String, RawProp>) -> Self {
        let mut entries = IndexMap::with_capacity(raw.len());
        for (key, value) in raw {
            let classified = match value {
                RawProp::Static(Value::Map(map)) if key == STYLE_KEY => {
                    let fixed = map
                        .into_iter()
                        .map(|(name, v)| StyleEntry::Fixed(name, v))
                        .collect();
                    PropValue::Style(graph.create_style(fixed))
                }
                RawProp::Static(v) => PropValue::Static(v),
                RawProp::Node(tag) if key == STYLE_KEY => PropValue::Style(tag),
                RawProp::Node(tag) => PropValue::Node(tag),
                RawProp::Style(style_entries) => {
                    PropValue::Style(graph.create_style(style_entries))
                }
                RawProp::Event(event) => PropValue::Event(event),
            };
            entries.insert(key, classified);
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Keys in the value classification, sorted for set comparison.
    pub fn value_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, v)| v.is_value_binding())
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Keys in the event classification, sorted for set comparison.
    pub fn event_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, v)| v.is_event_binding())
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// (key, node) pairs for the props composite.
    pub fn value_entries(&self) -> Vec<(String, NodeTag)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.node().map(|tag| (k.clone(), tag)))
            .collect()
    }

    /// Style composite tags owned by this bag.
    pub fn style_tags(&self) -> Vec<NodeTag> {
        self.entries
            .values()
            .filter_map(|v| match v {
                PropValue::Style(tag) => Some(*tag),
                _ => None,
            })
            .collect()
    }

    /// Event bound to the given native event name, if any.
    pub fn event(&self, name: &str) -> Option<&AnimatedEvent> {
        self.entries.values().find_map(|v| match v {
            PropValue::Event(event) if event.name == name => Some(event),
            _ => None,
        })
    }

    pub(crate) fn events_mut(&mut self) -> impl Iterator<Item = &mut AnimatedEvent> {
        self.entries.values_mut().filter_map(|v| match v {
            PropValue::Event(event) => Some(event),
            _ => None,
        })
    }

    pub(crate) fn insert(&mut self, key: String, value: PropValue) {
        self.entries.insert(key, value);
    }

    pub(crate) fn shift_remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.shift_remove(key)
    }

    pub fn into_entries(self) -> IndexMap<String, PropValue> {
        self.entries
    }
}

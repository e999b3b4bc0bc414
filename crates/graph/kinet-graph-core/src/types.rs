//! Node kinds and graph configuration.

use kinet_api_core::Value;
use serde::{Deserialize, Serialize};

use crate::ids::NodeTag;

/// One entry of a style composite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StyleEntry {
    /// Immutable style value carried through to resolution unchanged.
    Fixed(String, Value),
    /// Style property driven by a graph node.
    Node(String, NodeTag),
}

impl StyleEntry {
    /// Style-property name of this entry.
    pub fn name(&self) -> &str {
        match self {
            StyleEntry::Fixed(name, _) | StyleEntry::Node(name, _) => name,
        }
    }

    /// Driving node, when this entry is animated.
    pub fn node(&self) -> Option<NodeTag> {
        match self {
            StyleEntry::Fixed(_, _) => None,
            StyleEntry::Node(_, tag) => Some(*tag),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Leaf value, written by the host tick loop or the native driver.
    Value(Value),
    /// Ordered transform-op list; each op amount is driven by a node.
    Transform { ops: Vec<(String, NodeTag)> },
    /// Style composite materialized as a single node.
    Style { entries: Vec<StyleEntry> },
    /// Property-set composite owned by a prop-binding instance.
    Props { entries: Vec<(String, NodeTag)> },
}

impl NodeKind {
    /// Tags of the nodes this kind reads from.
    pub fn inputs(&self) -> Vec<NodeTag> {
        match self {
            NodeKind::Value(_) => Vec::new(),
            NodeKind::Transform { ops } => ops.iter().map(|(_, tag)| *tag).collect(),
            NodeKind::Style { entries } => entries.iter().filter_map(StyleEntry::node).collect(),
            NodeKind::Props { entries } => entries.iter().map(|(_, tag)| *tag).collect(),
        }
    }
}

/// A node slot in the registry arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Dependent edges (refcounted; one occurrence per live edge).
    pub dependents: Vec<NodeTag>,
    /// Consumer edge held by a prop-binding composite. Counts as one
    /// dependent for cascade purposes.
    pub notify: bool,
    /// Recomputation of this node is delegated to the native backend.
    pub native: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            dependents: Vec::new(),
            notify: false,
            native: false,
        }
    }

    /// Total number of live edges keeping this node wired.
    #[inline]
    pub fn dependent_count(&self) -> usize {
        self.dependents.len() + usize::from(self.notify)
    }
}

/// Sizing hints for the registry arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Initial capacity of the node arena.
    pub node_capacity: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { node_capacity: 256 }
    }
}

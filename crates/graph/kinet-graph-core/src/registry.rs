//! Registry: arena of animated nodes with refcounted dependent edges.
//!
//! Edge bookkeeping is explicit. A composite wires itself to its inputs when
//! its first dependent (or consumer) arrives and unwinds those edges when the
//! last one leaves; cascades remove edges only, never node slots. Slots are
//! freed by `release`, and releasing a node that still has live dependents is
//! an error rather than a deferred cleanup.

use hashbrown::HashSet;
use kinet_api_core::{TransformOp, Value};
use thiserror::Error;

use crate::ids::{NodeTag, TagAllocator};
use crate::types::{GraphConfig, Node, NodeKind, StyleEntry};

/// Errors raised by graph mutations. All of them indicate caller protocol
/// violations; none are transient.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeTag),
    #[error("node {0:?} is not a writable leaf")]
    NotALeaf(NodeTag),
    #[error("node {0:?} is not a props composite")]
    NotAComposite(NodeTag),
    #[error("no matching edge to remove on node {0:?}")]
    MissingEdge(NodeTag),
    #[error("node {0:?} still has live dependents")]
    Busy(NodeTag),
}

/// Consumer composites reached by one propagation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications(Vec<NodeTag>);

impl Notifications {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, tag: NodeTag) -> bool {
        self.0.contains(&tag)
    }

    #[inline]
    pub fn tags(&self) -> &[NodeTag] {
        &self.0
    }

    pub fn merge(&mut self, other: Notifications) {
        for tag in other.0 {
            self.push_unique(tag);
        }
    }

    fn push_unique(&mut self, tag: NodeTag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }
}

/// Arena of animated nodes indexed by [`NodeTag`].
#[derive(Debug, Default)]
pub struct GraphRegistry {
    slots: Vec<Option<Node>>,
    tags: TagAllocator,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::with_config(&GraphConfig::default())
    }

    pub fn with_config(cfg: &GraphConfig) -> Self {
        Self {
            slots: Vec::with_capacity(cfg.node_capacity),
            tags: TagAllocator::new(),
        }
    }

    fn insert(&mut self, kind: NodeKind) -> NodeTag {
        let tag = self.tags.alloc();
        debug_assert_eq!(tag.0 as usize, self.slots.len());
        self.slots.push(Some(Node::new(kind)));
        tag
    }

    /// Create a writable leaf node.
    pub fn create_value(&mut self, value: Value) -> NodeTag {
        self.insert(NodeKind::Value(value))
    }

    /// Create a transform-op list node.
    pub fn create_transform(&mut self, ops: Vec<(String, NodeTag)>) -> NodeTag {
        self.insert(NodeKind::Transform { ops })
    }

    /// Create a style composite.
    pub fn create_style(&mut self, entries: Vec<StyleEntry>) -> NodeTag {
        self.insert(NodeKind::Style { entries })
    }

    /// Create a property-set composite.
    pub fn create_props(&mut self, entries: Vec<(String, NodeTag)>) -> NodeTag {
        self.insert(NodeKind::Props { entries })
    }

    fn node(&self, tag: NodeTag) -> Result<&Node, GraphError> {
        self.slots
            .get(tag.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(GraphError::UnknownNode(tag))
    }

    fn node_mut(&mut self, tag: NodeTag) -> Result<&mut Node, GraphError> {
        self.slots
            .get_mut(tag.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownNode(tag))
    }

    /// Whether `tag` resolves to a live node.
    #[inline]
    pub fn contains(&self, tag: NodeTag) -> bool {
        self.node(tag).is_ok()
    }

    /// Number of live node slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind of a live node (used for structural equality of composites).
    pub fn kind(&self, tag: NodeTag) -> Result<&NodeKind, GraphError> {
        Ok(&self.node(tag)?.kind)
    }

    /// Live edges currently keeping `tag` wired.
    pub fn dependent_count(&self, tag: NodeTag) -> Result<usize, GraphError> {
        Ok(self.node(tag)?.dependent_count())
    }

    /// Whether the node is wired into the propagation graph.
    pub fn is_wired(&self, tag: NodeTag) -> Result<bool, GraphError> {
        Ok(self.node(tag)?.dependent_count() > 0)
    }

    pub fn is_native(&self, tag: NodeTag) -> Result<bool, GraphError> {
        Ok(self.node(tag)?.native)
    }

    /// Add a dependent edge. The node wires itself to its inputs when its
    /// first edge arrives, recursively.
    pub fn attach_dependent(
        &mut self,
        tag: NodeTag,
        dependent: NodeTag,
    ) -> Result<(), GraphError> {
        let wire = {
            let node = self.node_mut(tag)?;
            let was_unwired = node.dependent_count() == 0;
            node.dependents.push(dependent);
            was_unwired
        };
        if wire {
            for input in self.node(tag)?.kind.inputs() {
                self.attach_dependent(input, tag)?;
            }
        }
        Ok(())
    }

    /// Remove one dependent edge. When the count reaches zero the node
    /// unwinds from its inputs, recursively.
    pub fn detach_dependent(
        &mut self,
        tag: NodeTag,
        dependent: NodeTag,
    ) -> Result<(), GraphError> {
        let unwire = {
            let node = self.node_mut(tag)?;
            let pos = node
                .dependents
                .iter()
                .position(|d| *d == dependent)
                .ok_or(GraphError::MissingEdge(tag))?;
            node.dependents.remove(pos);
            node.dependent_count() == 0
        };
        if unwire {
            for input in self.node(tag)?.kind.inputs() {
                self.detach_dependent(input, tag)?;
            }
        }
        Ok(())
    }

    /// Place the consumer edge on a composite. Counts as one dependent, so
    /// this wires the composite's whole subtree on a fresh node.
    pub fn attach_consumer(&mut self, tag: NodeTag) -> Result<(), GraphError> {
        let wire = {
            let node = self.node_mut(tag)?;
            if node.notify {
                return Err(GraphError::Busy(tag));
            }
            let was_unwired = node.dependent_count() == 0;
            node.notify = true;
            was_unwired
        };
        if wire {
            for input in self.node(tag)?.kind.inputs() {
                self.attach_dependent(input, tag)?;
            }
        }
        Ok(())
    }

    /// Remove the consumer edge, unwinding the subtree when it was the last
    /// edge.
    pub fn detach_consumer(&mut self, tag: NodeTag) -> Result<(), GraphError> {
        let unwire = {
            let node = self.node_mut(tag)?;
            if !node.notify {
                return Err(GraphError::MissingEdge(tag));
            }
            node.notify = false;
            node.dependent_count() == 0
        };
        if unwire {
            for input in self.node(tag)?.kind.inputs() {
                self.detach_dependent(input, tag)?;
            }
        }
        Ok(())
    }

    /// Replace (or remove, with `next == None`) the entry named `name` of a
    /// props composite. On a wired composite the old child edge is detached
    /// before the new one is attached, so the key is replaced atomically
    /// without touching sibling bindings.
    pub fn props_replace(
        &mut self,
        composite: NodeTag,
        name: &str,
        next: Option<NodeTag>,
    ) -> Result<(), GraphError> {
        let wired = self.node(composite)?.dependent_count() > 0;
        let previous = {
            let node = self.node_mut(composite)?;
            let entries = match &mut node.kind {
                NodeKind::Props { entries } => entries,
                _ => return Err(GraphError::NotAComposite(composite)),
            };
            let pos = entries.iter().position(|(n, _)| n == name);
            match (pos, next) {
                (Some(i), Some(tag)) => {
                    let old = entries[i].1;
                    entries[i].1 = tag;
                    Some(old)
                }
                (Some(i), None) => Some(entries.remove(i).1),
                (None, Some(tag)) => {
                    entries.push((name.to_string(), tag));
                    None
                }
                (None, None) => None,
            }
        };
        if wired {
            if let Some(old) = previous {
                self.detach_dependent(old, composite)?;
            }
            if let Some(tag) = next {
                self.attach_dependent(tag, composite)?;
            }
        }
        Ok(())
    }

    /// Host-thread write to a leaf. Propagates through dependent edges and
    /// returns the consumer composites reached.
    pub fn set_value(&mut self, tag: NodeTag, value: Value) -> Result<Notifications, GraphError> {
        match &mut self.node_mut(tag)?.kind {
            NodeKind::Value(slot) => *slot = value,
            _ => return Err(GraphError::NotALeaf(tag)),
        }

        let mut notes = Notifications::default();
        let mut visited: HashSet<NodeTag> = HashSet::new();
        let mut queue = vec![tag];
        while let Some(current) = queue.pop() {
            if !visited.insert(current) {
                continue;
            }
            let node = self.node(current)?;
            if node.notify {
                notes.push_unique(current);
            }
            queue.extend(node.dependents.iter().copied());
        }
        Ok(notes)
    }

    /// Mark a node and, recursively, its inputs as driven by the native
    /// backend. Idempotent.
    pub fn make_native(&mut self, tag: NodeTag) -> Result<(), GraphError> {
        if self.node(tag)?.native {
            return Ok(());
        }
        self.node_mut(tag)?.native = true;
        for input in self.node(tag)?.kind.inputs() {
            self.make_native(input)?;
        }
        Ok(())
    }

    /// Resolve the current value of a node. Transform lists resolve to
    /// [`Value::Transform`], composites to [`Value::Map`].
    pub fn current_value(&self, tag: NodeTag) -> Result<Value, GraphError> {
        match &self.node(tag)?.kind {
            NodeKind::Value(value) => Ok(value.clone()),
            NodeKind::Transform { ops } => {
                let mut resolved = Vec::with_capacity(ops.len());
                for (op, input) in ops {
                    let amount = self.current_value(*input)?.as_float().unwrap_or(0.0);
                    resolved.push(TransformOp {
                        op: op.clone(),
                        amount,
                    });
                }
                Ok(Value::Transform(resolved))
            }
            NodeKind::Style { entries } => {
                let mut map = kinet_api_core::ValueMap::new();
                for entry in entries {
                    match entry {
                        StyleEntry::Fixed(name, value) => {
                            map.insert(name.clone(), value.clone());
                        }
                        StyleEntry::Node(name, input) => {
                            map.insert(name.clone(), self.current_value(*input)?);
                        }
                    }
                }
                Ok(Value::Map(map))
            }
            NodeKind::Props { entries } => {
                let mut map = kinet_api_core::ValueMap::new();
                for (name, input) in entries {
                    map.insert(name.clone(), self.current_value(*input)?);
                }
                Ok(Value::Map(map))
            }
        }
    }

    /// Free a node slot. The node must have no live dependents.
    pub fn release(&mut self, tag: NodeTag) -> Result<(), GraphError> {
        if self.node(tag)?.dependent_count() > 0 {
            return Err(GraphError::Busy(tag));
        }
        self.slots[tag.0 as usize] = None;
        Ok(())
    }

    /// Free a node slot if it exists and nothing depends on it. Returns
    /// whether the slot was freed.
    pub fn release_if_unused(&mut self, tag: NodeTag) -> bool {
        match self.node(tag) {
            Ok(node) if node.dependent_count() == 0 => {
                self.slots[tag.0 as usize] = None;
                true
            }
            _ => false,
        }
    }
}

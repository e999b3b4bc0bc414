//! Classification-aware diffing between successive property bags.
//!
//! A key added or removed from either classification changes the shape of
//! the animated surface and forces full reattachment; identical key sets are
//! compared per key with deep, order-insensitive structural equality so that
//! unrelated prop churn never tears down live subscriptions.

use kinet_graph_core::{GraphRegistry, NodeKind, NodeTag, StyleEntry};

use crate::props::{PropValue, PropertyBag};

/// Outcome of planning one prop update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffPlan {
    /// The animated key set itself changed: reattach the whole property set.
    Structural,
    /// Same shape: reattach exactly these keys, carry the rest over.
    Keys(Vec<String>),
}

/// Plan the minimal reattachment between `prev` and `next`.
pub fn plan(graph: &GraphRegistry, prev: &PropertyBag, next: &PropertyBag) -> DiffPlan {
    if prev.value_keys() != next.value_keys() || prev.event_keys() != next.event_keys() {
        return DiffPlan::Structural;
    }

    let mut changed = Vec::new();
    for (key, next_value) in next.iter() {
        match prev.get(key) {
            Some(prev_value) if values_equal(graph, prev_value, next_value) => {}
            _ => changed.push(key.clone()),
        }
    }
    DiffPlan::Keys(changed)
}

/// Deep structural equality of two classified prop values. Event attachment
/// state is excluded; leaves compare by node identity; composites compare by
/// contents, order-insensitively.
pub fn values_equal(graph: &GraphRegistry, a: &PropValue, b: &PropValue) -> bool {
    match (a, b) {
        (PropValue::Static(x), PropValue::Static(y)) => x == y,
        (PropValue::Node(x), PropValue::Node(y)) => x == y || nodes_equal(graph, *x, *y),
        (PropValue::Style(x), PropValue::Style(y)) => x == y || nodes_equal(graph, *x, *y),
        (PropValue::Event(x), PropValue::Event(y)) => x.same_binding(y),
        _ => false,
    }
}

fn nodes_equal(graph: &GraphRegistry, a: NodeTag, b: NodeTag) -> bool {
    if a == b {
        return true;
    }
    let (Ok(ka), Ok(kb)) = (graph.kind(a), graph.kind(b)) else {
        return false;
    };
    match (ka, kb) {
        (NodeKind::Style { entries: ea }, NodeKind::Style { entries: eb }) => {
            style_entries_equal(graph, ea, eb)
        }
        (NodeKind::Transform { ops: oa }, NodeKind::Transform { ops: ob }) => {
            // Transform order is meaningful; compare positionally.
            oa.len() == ob.len()
                && oa
                    .iter()
                    .zip(ob)
                    .all(|((na, ta), (nb, tb))| na == nb && nodes_equal(graph, *ta, *tb))
        }
        // Distinct leaves are distinct animations even when their current
        // values coincide.
        _ => false,
    }
}

fn style_entries_equal(graph: &GraphRegistry, a: &[StyleEntry], b: &[StyleEntry]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|ea| {
        b.iter()
            .find(|eb| eb.name() == ea.name())
            .is_some_and(|eb| match (ea, eb) {
                (StyleEntry::Fixed(_, va), StyleEntry::Fixed(_, vb)) => va == vb,
                (StyleEntry::Node(_, ta), StyleEntry::Node(_, tb)) => nodes_equal(graph, *ta, *tb),
                _ => false,
            })
    })
}

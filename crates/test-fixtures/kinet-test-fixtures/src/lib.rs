//! Shared mocks and builders for the kinet crates' tests.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use kinet_api_core::{Value, ValueMap, ViewTag};
use kinet_binding_core::{
    AnimatedComponent, BindingError, ChangeOutcome, EventMapping, NativeAnimationBackend,
    PropertyBag, RawProp, RenderHost,
};
use kinet_graph_core::{GraphRegistry, NodeTag};

/// One call recorded by [`RecordingBackend`], in issue order.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    Connect(NodeTag, ViewTag),
    Disconnect(NodeTag, ViewTag),
    AttachEvent(ViewTag, String),
    DetachEvent(ViewTag, String),
}

/// Backend that records every call so tests can assert exact pairing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn connects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Connect(_, _)))
            .count()
    }

    pub fn disconnects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Disconnect(_, _)))
            .count()
    }

    pub fn event_attaches(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::AttachEvent(_, _)))
            .count()
    }

    pub fn event_detaches(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::DetachEvent(_, _)))
            .count()
    }
}

impl NativeAnimationBackend for RecordingBackend {
    fn connect_node_to_view(&mut self, node: NodeTag, view: ViewTag) {
        self.calls.push(BackendCall::Connect(node, view));
    }

    fn disconnect_node_from_view(&mut self, node: NodeTag, view: ViewTag) {
        self.calls.push(BackendCall::Disconnect(node, view));
    }

    fn attach_event_to_view(&mut self, view: ViewTag, event: &str, _mapping: &EventMapping) {
        self.calls.push(BackendCall::AttachEvent(view, event.to_string()));
    }

    fn detach_event_from_view(&mut self, view: ViewTag, event: &str) {
        self.calls.push(BackendCall::DetachEvent(view, event.to_string()));
    }
}

/// Render host with a programmable view table and full call recording.
#[derive(Debug, Default)]
pub struct MockRenderHost {
    views: HashMap<String, ViewTag>,
    direct_capable: HashSet<ViewTag>,
    event_targets: HashMap<ViewTag, ViewTag>,
    pub set_props_calls: Vec<(ViewTag, ValueMap)>,
    pub render_requests: Vec<String>,
}

impl MockRenderHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mounted view for a component label.
    pub fn mount_view(&mut self, component: &str, view: ViewTag, direct_capable: bool) {
        self.views.insert(component.to_string(), view);
        if direct_capable {
            self.direct_capable.insert(view);
        }
    }

    /// Replace the view behind a component (re-parenting / ref churn).
    pub fn rebind_view(&mut self, component: &str, view: ViewTag, direct_capable: bool) {
        self.mount_view(component, view, direct_capable);
    }

    /// Route events for `view` at a nested inner node (scroll containers).
    pub fn set_event_target(&mut self, view: ViewTag, target: ViewTag) {
        self.event_targets.insert(view, target);
    }
}

impl RenderHost for MockRenderHost {
    fn resolve_view(&mut self, component: &str) -> Result<ViewTag, BindingError> {
        self.views
            .get(component)
            .copied()
            .ok_or_else(|| BindingError::ViewUnresolved(component.to_string()))
    }

    fn event_target(&mut self, view: ViewTag) -> ViewTag {
        self.event_targets.get(&view).copied().unwrap_or(view)
    }

    fn supports_direct_mutation(&self, view: ViewTag) -> bool {
        self.direct_capable.contains(&view)
    }

    fn set_props_directly(&mut self, view: ViewTag, values: &ValueMap) {
        self.set_props_calls.push((view, values.clone()));
    }

    fn request_render(&mut self, component: &str) {
        self.render_requests.push(component.to_string());
    }
}

/// Build a bag from raw entries in declaration order.
pub fn bag(graph: &mut GraphRegistry, entries: Vec<(&str, RawProp)>) -> PropertyBag {
    let raw: IndexMap<String, RawProp> = entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    PropertyBag::ingest(graph, raw)
}

/// Shorthand for a float leaf node.
pub fn leaf(graph: &mut GraphRegistry, value: f32) -> NodeTag {
    graph.create_value(Value::Float(value))
}

/// One host tick: write a leaf and route the notifications into the
/// component, the way the host loop does it.
pub fn drive(
    graph: &mut GraphRegistry,
    component: &mut AnimatedComponent,
    host: &mut MockRenderHost,
    tag: NodeTag,
    value: Value,
) -> Result<ChangeOutcome> {
    let notes = graph
        .set_value(tag, value)
        .map_err(|e| anyhow!("graph write failed: {e}"))?;
    component
        .handle_notifications(&notes, graph, host)
        .map_err(|e| anyhow!("change handling failed: {e}"))
}

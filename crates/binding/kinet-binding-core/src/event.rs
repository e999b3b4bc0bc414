//! Animated events: a native event name plus a payload-to-node mapping.
//!
//! An event fired by a view either drives graph nodes on the host thread
//! (`EventDriver::Host`, via [`AnimatedEvent::apply`]) or is handed to the
//! native backend wholesale (`EventDriver::Native`), in which case the host
//! never sees the payload.

use kinet_api_core::{EventPath, ViewTag};
use kinet_graph_core::{GraphError, GraphRegistry, NodeTag, Notifications};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::backend::NativeAnimationBackend;

/// Which execution domain consumes the event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDriver {
    Host,
    Native,
}

/// Ordered payload-path to node mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMapping(pub Vec<(EventPath, NodeTag)>);

impl EventMapping {
    pub fn single(path: EventPath, node: NodeTag) -> Self {
        Self(vec![(path, node)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimatedEvent {
    pub name: String,
    pub mapping: EventMapping,
    pub driver: EventDriver,
    /// View this event is currently attached to. Cached state only; it is
    /// excluded from binding equality so attaching never reads as a change.
    #[serde(skip)]
    attached_to: Option<ViewTag>,
}

impl AnimatedEvent {
    pub fn new(name: impl Into<String>, mapping: EventMapping, driver: EventDriver) -> Self {
        Self {
            name: name.into(),
            mapping,
            driver,
            attached_to: None,
        }
    }

    /// Event consumed on the host thread.
    pub fn host(name: impl Into<String>, mapping: EventMapping) -> Self {
        Self::new(name, mapping, EventDriver::Host)
    }

    /// Event dispatched to the native animation backend.
    pub fn native(name: impl Into<String>, mapping: EventMapping) -> Self {
        Self::new(name, mapping, EventDriver::Native)
    }

    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }

    pub fn attached_view(&self) -> Option<ViewTag> {
        self.attached_to
    }

    /// Structural equality, ignoring the cached attachment state.
    pub fn same_binding(&self, other: &AnimatedEvent) -> bool {
        self.name == other.name && self.driver == other.driver && self.mapping == other.mapping
    }

    /// Bind this event to a view. Native-driver events are registered with
    /// the backend; host-driver events only record the target.
    pub fn attach(&mut self, view: ViewTag, backend: &mut dyn NativeAnimationBackend) {
        if self.attached_to == Some(view) {
            return;
        }
        if self.attached_to.is_some() {
            self.detach(backend);
        }
        if self.driver == EventDriver::Native {
            backend.attach_event_to_view(view, &self.name, &self.mapping);
        }
        self.attached_to = Some(view);
    }

    /// Undo [`attach`](Self::attach). Safe to call when not attached.
    pub fn detach(&mut self, backend: &mut dyn NativeAnimationBackend) {
        if let Some(view) = self.attached_to.take() {
            if self.driver == EventDriver::Native {
                backend.detach_event_from_view(view, &self.name);
            }
        }
    }

    /// Host-path dispatch: write every mapped payload field into the graph
    /// and return the union of the notifications produced.
    pub fn apply(
        &self,
        graph: &mut GraphRegistry,
        payload: &JsonValue,
    ) -> Result<Notifications, GraphError> {
        let mut notes = Notifications::default();
        for (path, node) in &self.mapping.0 {
            if let Some(value) = path.lookup(payload) {
                notes.merge(graph.set_value(*node, value)?);
            }
        }
        Ok(notes)
    }
}

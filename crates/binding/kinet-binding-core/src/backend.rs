//! Native animation backend capability contract.

use kinet_api_core::ViewTag;
use kinet_graph_core::NodeTag;

use crate::event::EventMapping;

/// Backend that runs animation curves off the host thread and applies
/// native-mode node values directly to views.
///
/// The calls are assumed safe only when correctly paired by this crate:
/// every connect is matched by exactly one disconnect and every event attach
/// by one detach. Mis-pairing is this crate's bug, not the backend's.
pub trait NativeAnimationBackend {
    fn connect_node_to_view(&mut self, node: NodeTag, view: ViewTag);
    fn disconnect_node_from_view(&mut self, node: NodeTag, view: ViewTag);
    fn attach_event_to_view(&mut self, view: ViewTag, event: &str, mapping: &EventMapping);
    fn detach_event_from_view(&mut self, view: ViewTag, event: &str);
}

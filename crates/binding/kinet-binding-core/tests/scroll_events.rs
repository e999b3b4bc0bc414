use kinet_binding_core::{
    scroll_event_payload, AnimatedComponent, AnimatedEvent, ChangeOutcome, EventMapping,
    EventPath, RawProp, ScrollDispatchGate, Value, ViewTag, WrapperConfig,
};
use kinet_graph_core::GraphRegistry;
use kinet_test_fixtures::{bag, leaf, BackendCall, MockRenderHost, RecordingBackend};

#[test]
fn scroll_offsets_drive_animated_props_on_the_host_path() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let offset_y = leaf(&mut graph, 0.0);
    let view = ViewTag(41);
    host.mount_view("scroller", view, true);

    let initial = bag(
        &mut graph,
        vec![
            ("translateY", RawProp::Node(offset_y)),
            (
                "onScroll",
                RawProp::Event(AnimatedEvent::host(
                    "topScroll",
                    EventMapping::single(EventPath::parse("contentOffset.y").unwrap(), offset_y),
                )),
            ),
        ],
    );
    let mut component = AnimatedComponent::new(WrapperConfig::new("scroller"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();

    let mut gate = ScrollDispatchGate::new();
    let sample = gate.offer(0.0, 40.0, 16.0).unwrap();
    let payload = scroll_event_payload(&sample);
    let outcome = component
        .dispatch_event("topScroll", &payload, &mut graph, &mut host)
        .unwrap();

    assert_eq!(outcome, ChangeOutcome::DirectMutation);
    assert_eq!(
        host.set_props_calls[0].1.get("translateY"),
        Some(&Value::Float(40.0))
    );

    // A repeated offset is gated out before dispatch.
    assert!(gate.offer(0.0, 40.0, 32.0).is_none());
}

#[test]
fn native_scroll_events_attach_to_the_inner_scrollable_node() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let offset_y = leaf(&mut graph, 0.0);
    let (outer, inner) = (ViewTag(51), ViewTag(52));
    host.mount_view("scroller", outer, true);
    host.set_event_target(outer, inner);

    let initial = bag(
        &mut graph,
        vec![(
            "onScroll",
            RawProp::Event(AnimatedEvent::native(
                "topScroll",
                EventMapping::single(EventPath::parse("contentOffset.y").unwrap(), offset_y),
            )),
        )],
    );
    let mut component = AnimatedComponent::new(WrapperConfig::new("scroller"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();

    assert_eq!(
        backend.calls,
        vec![BackendCall::AttachEvent(inner, "topScroll".into())]
    );

    backend.clear();
    component.will_unmount(&mut graph, &mut backend).unwrap();
    assert_eq!(
        backend.calls,
        vec![BackendCall::DetachEvent(inner, "topScroll".into())]
    );
}

#[test]
fn host_dispatch_ignores_native_driven_events() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let offset_y = leaf(&mut graph, 0.0);
    let view = ViewTag(61);
    host.mount_view("scroller", view, true);

    let initial = bag(
        &mut graph,
        vec![(
            "onScroll",
            RawProp::Event(AnimatedEvent::native(
                "topScroll",
                EventMapping::single(EventPath::parse("contentOffset.y").unwrap(), offset_y),
            )),
        )],
    );
    let mut component = AnimatedComponent::new(WrapperConfig::new("scroller"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();

    let payload = serde_json::json!({ "contentOffset": { "x": 0.0, "y": 99.0 } });
    let outcome = component
        .dispatch_event("topScroll", &payload, &mut graph, &mut host)
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Ignored);
    // The backend owns delivery; the host write never happened.
    assert_eq!(graph.current_value(offset_y).unwrap(), Value::Float(0.0));
}

#[test]
fn unmapped_events_are_ignored() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    host.mount_view("card", ViewTag(71), true);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(WrapperConfig::new("card"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();

    let payload = serde_json::json!({ "contentOffset": { "x": 0.0, "y": 1.0 } });
    let outcome = component
        .dispatch_event("topScroll", &payload, &mut graph, &mut host)
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Ignored);
}

use kinet_binding_core::{
    AnimatedEvent, AnimatedProps, BindingError, EventMapping, EventPath, RawProp, StyleEntry,
    Value, ViewTag,
};
use kinet_graph_core::GraphRegistry;
use kinet_test_fixtures::{bag, leaf, BackendCall, RecordingBackend};

#[test]
fn attach_then_detach_restores_edge_counts() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let opacity = leaf(&mut graph, 1.0);
    let width = leaf(&mut graph, 40.0);

    let props_bag = bag(
        &mut graph,
        vec![
            (
                "style",
                RawProp::Style(vec![StyleEntry::Node("opacity".into(), opacity)]),
            ),
            ("width", RawProp::Node(width)),
            ("label", RawProp::Static(Value::Text("card".into()))),
        ],
    );
    assert_eq!(graph.dependent_count(opacity).unwrap(), 0);
    assert_eq!(graph.dependent_count(width).unwrap(), 0);

    let mut props = AnimatedProps::new(props_bag);
    props.attach(&mut graph, &mut backend).unwrap();
    assert_eq!(graph.dependent_count(opacity).unwrap(), 1);
    assert_eq!(graph.dependent_count(width).unwrap(), 1);
    assert!(props.composite_tag().is_some());

    props.detach(&mut graph, &mut backend).unwrap();
    assert_eq!(graph.dependent_count(opacity).unwrap(), 0);
    assert_eq!(graph.dependent_count(width).unwrap(), 0);
    assert!(props.composite_tag().is_none());
    assert!(backend.calls.is_empty());
}

#[test]
fn double_attach_is_a_contract_violation() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let opacity = leaf(&mut graph, 1.0);
    let props_bag = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);

    let mut props = AnimatedProps::new(props_bag);
    props.attach(&mut graph, &mut backend).unwrap();
    assert!(matches!(
        props.attach(&mut graph, &mut backend),
        Err(BindingError::AlreadyAttached)
    ));
}

#[test]
fn detach_without_attach_is_inert() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let props_bag = bag(&mut graph, vec![]);
    let mut props = AnimatedProps::new(props_bag);
    props.detach(&mut graph, &mut backend).unwrap();
    assert!(backend.calls.is_empty());
}

fn scroll_event(graph: &mut GraphRegistry) -> AnimatedEvent {
    let y = leaf(graph, 0.0);
    AnimatedEvent::native(
        "topScroll",
        EventMapping::single(EventPath::parse("contentOffset.y").unwrap(), y),
    )
}

#[test]
fn detach_disconnects_view_before_events_and_subscriptions() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let opacity = leaf(&mut graph, 1.0);
    let event = scroll_event(&mut graph);
    let props_bag = bag(
        &mut graph,
        vec![
            ("opacity", RawProp::Node(opacity)),
            ("onScroll", RawProp::Event(event)),
        ],
    );

    let view = ViewTag(3);
    let mut props = AnimatedProps::new(props_bag);
    props.attach(&mut graph, &mut backend).unwrap();
    props.update_view(view, view, &mut backend);
    props.make_native(&mut graph, &mut backend).unwrap();
    let composite = props.composite_tag().unwrap();
    backend.clear();

    props.detach(&mut graph, &mut backend).unwrap();
    assert_eq!(
        backend.calls,
        vec![
            BackendCall::Disconnect(composite, view),
            BackendCall::DetachEvent(view, "topScroll".into()),
        ]
    );
}

#[test]
fn update_view_with_identical_handle_is_a_no_op() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let event = scroll_event(&mut graph);
    let props_bag = bag(&mut graph, vec![("onScroll", RawProp::Event(event))]);

    let view = ViewTag(9);
    let mut props = AnimatedProps::new(props_bag);
    props.attach(&mut graph, &mut backend).unwrap();
    props.update_view(view, view, &mut backend);
    backend.clear();

    props.update_view(view, view, &mut backend);
    assert!(backend.calls.is_empty());
}

#[test]
fn update_view_rebinds_native_edges_and_events_in_order() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let opacity = leaf(&mut graph, 1.0);
    let event = scroll_event(&mut graph);
    let props_bag = bag(
        &mut graph,
        vec![
            ("opacity", RawProp::Node(opacity)),
            ("onScroll", RawProp::Event(event)),
        ],
    );

    let (view_a, view_b) = (ViewTag(1), ViewTag(2));
    let mut props = AnimatedProps::new(props_bag);
    props.attach(&mut graph, &mut backend).unwrap();
    props.update_view(view_a, view_a, &mut backend);
    props.make_native(&mut graph, &mut backend).unwrap();
    let composite = props.composite_tag().unwrap();
    backend.clear();

    props.update_view(view_b, view_b, &mut backend);
    assert_eq!(
        backend.calls,
        vec![
            BackendCall::DetachEvent(view_a, "topScroll".into()),
            BackendCall::Disconnect(composite, view_a),
            BackendCall::Connect(composite, view_b),
            BackendCall::AttachEvent(view_b, "topScroll".into()),
        ]
    );
}

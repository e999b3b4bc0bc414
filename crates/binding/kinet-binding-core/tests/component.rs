use std::cell::RefCell;
use std::rc::Rc;

use kinet_binding_core::{
    AnimatedComponent, BindDecision, BindingError, BindingObserver, ChangeOutcome, Lifecycle,
    RawProp, StyleEntry, Value, ViewTag, WrapperConfig,
};
use kinet_graph_core::GraphRegistry;
use kinet_test_fixtures::{bag, drive, leaf, MockRenderHost, RecordingBackend};

#[derive(Clone, Debug, Default)]
struct SpyObserver {
    decisions: Rc<RefCell<Vec<(String, BindDecision)>>>,
}

impl BindingObserver for SpyObserver {
    fn on_decision(&self, key: &str, decision: BindDecision, _view: Option<ViewTag>) {
        self.decisions
            .borrow_mut()
            .push((key.to_string(), decision));
    }
}

fn mounted_component(
    graph: &mut GraphRegistry,
    backend: &mut RecordingBackend,
    host: &mut MockRenderHost,
    label: &str,
    initial: kinet_binding_core::PropertyBag,
) -> AnimatedComponent {
    let mut component = AnimatedComponent::new(WrapperConfig::new(label), initial);
    component.will_mount(graph, backend).unwrap();
    let rendered = component.render_values(graph).unwrap();
    assert!(!rendered.values.is_empty() || !rendered.events.is_empty());
    component.did_mount(graph, backend, host).unwrap();
    assert_eq!(component.state(), Lifecycle::Mounted);
    component
}

#[test]
fn host_advance_mutates_view_directly() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    let view = ViewTag(11);
    host.mount_view("card", view, true);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = mounted_component(&mut graph, &mut backend, &mut host, "card", initial);

    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.5)).unwrap();
    assert_eq!(outcome, ChangeOutcome::DirectMutation);
    assert_eq!(host.set_props_calls.len(), 1);
    let (mutated_view, values) = &host.set_props_calls[0];
    assert_eq!(*mutated_view, view);
    assert_eq!(values.get("opacity"), Some(&Value::Float(0.5)));
    assert!(host.render_requests.is_empty());
}

#[test]
fn missing_capability_falls_back_to_re_render() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    host.mount_view("plain", ViewTag(12), false);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = mounted_component(&mut graph, &mut backend, &mut host, "plain", initial);

    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.5)).unwrap();
    assert_eq!(outcome, ChangeOutcome::Rendered);
    assert!(host.set_props_calls.is_empty());
    assert_eq!(host.render_requests, vec!["plain".to_string()]);
}

#[test]
fn forced_re_render_override_wins_over_capability() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    host.mount_view("card", ViewTag(13), true);

    let mut cfg = WrapperConfig::new("card");
    cfg.force_rerender = true;
    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(cfg, initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();

    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.2)).unwrap();
    assert_eq!(outcome, ChangeOutcome::Rendered);
    assert!(host.set_props_calls.is_empty());
}

#[test]
fn pre_commit_changes_are_deferred_then_flushed() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    let view = ViewTag(14);
    host.mount_view("card", view, true);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(WrapperConfig::new("card"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();

    // Change arrives before commit: no mutation yet.
    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.4)).unwrap();
    assert_eq!(outcome, ChangeOutcome::Deferred);
    assert!(host.set_props_calls.is_empty());

    // Commit flushes the queued change.
    component.did_mount(&graph, &mut backend, &mut host).unwrap();
    assert_eq!(host.set_props_calls.len(), 1);
    assert_eq!(
        host.set_props_calls[0].1.get("opacity"),
        Some(&Value::Float(0.4))
    );
}

#[test]
fn queued_changes_are_dropped_when_torn_down_before_commit() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    host.mount_view("card", ViewTag(15), true);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(WrapperConfig::new("card"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();

    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.4)).unwrap();
    assert_eq!(outcome, ChangeOutcome::Deferred);

    component.will_unmount(&mut graph, &mut backend).unwrap();
    assert_eq!(component.state(), Lifecycle::Unmounted);
    assert!(host.set_props_calls.is_empty());
    assert!(host.render_requests.is_empty());

    // Unmounted is terminal.
    assert!(matches!(
        component.will_mount(&mut graph, &mut backend),
        Err(BindingError::Lifecycle { .. })
    ));
}

#[test]
fn unmount_releases_every_subscription() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    host.mount_view("card", ViewTag(16), true);
    let live_before_bag = graph.len();

    let initial = bag(
        &mut graph,
        vec![(
            "style",
            RawProp::Style(vec![StyleEntry::Node("opacity".into(), opacity)]),
        )],
    );
    let mut component = mounted_component(&mut graph, &mut backend, &mut host, "card", initial);

    let outcome = drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.3)).unwrap();
    assert_eq!(outcome, ChangeOutcome::DirectMutation);

    component.will_unmount(&mut graph, &mut backend).unwrap();
    assert_eq!(graph.dependent_count(opacity).unwrap(), 0);
    assert!(component.props().composite_tag().is_none());
    // Composite and style slots are gone; only the caller's leaf remains.
    assert_eq!(graph.len(), live_before_bag);
}

#[test]
fn rebound_view_receives_subsequent_mutations() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);
    let (view_a, view_b) = (ViewTag(21), ViewTag(22));
    host.mount_view("card", view_a, true);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = mounted_component(&mut graph, &mut backend, &mut host, "card", initial);

    // The framework re-parents the component onto a new concrete view.
    host.rebind_view("card", view_b, true);
    let next = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    component
        .will_receive_props(&mut graph, &mut backend, next)
        .unwrap();
    component.did_update(&mut backend, &mut host).unwrap();

    drive(&mut graph, &mut component, &mut host, opacity, Value::f(0.9)).unwrap();
    assert_eq!(host.set_props_calls.len(), 1);
    assert_eq!(host.set_props_calls[0].0, view_b);
}

#[test]
fn style_replacement_reattaches_exactly_the_style_key() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let rotate = leaf(&mut graph, 0.1);
    let scale = leaf(&mut graph, 1.0);
    let transform = graph.create_transform(vec![
        ("rotate".to_string(), rotate),
        ("scale".to_string(), scale),
    ]);
    host.mount_view("card", ViewTag(31), true);

    let spy = SpyObserver::default();
    let initial = bag(
        &mut graph,
        vec![
            (
                "style",
                RawProp::Style(vec![
                    StyleEntry::Node("transform".into(), transform),
                    StyleEntry::Fixed("opacity".into(), Value::Float(1.0)),
                ]),
            ),
            ("label", RawProp::Static(Value::Text("card".into()))),
        ],
    );
    let mut component =
        AnimatedComponent::with_observer(WrapperConfig::new("card"), initial, Box::new(spy.clone()));
    component.will_mount(&mut graph, &mut backend).unwrap();
    component.did_mount(&graph, &mut backend, &mut host).unwrap();
    let live_nodes = graph.len();

    // Same transform node, different fixed entry: only `style` differs.
    let next = bag(
        &mut graph,
        vec![
            (
                "style",
                RawProp::Style(vec![
                    StyleEntry::Node("transform".into(), transform),
                    StyleEntry::Fixed("opacity".into(), Value::Float(0.5)),
                ]),
            ),
            ("label", RawProp::Static(Value::Text("card".into()))),
        ],
    );
    component
        .will_receive_props(&mut graph, &mut backend, next)
        .unwrap();

    let decisions = spy.decisions.borrow();
    assert!(decisions.contains(&("style".to_string(), BindDecision::Reattach)));
    assert!(decisions.contains(&("label".to_string(), BindDecision::Reuse)));
    drop(decisions);

    // The shared transform subtree survived the swap: still wired, with the
    // unchanged per-transform leaves intact.
    assert_eq!(graph.dependent_count(transform).unwrap(), 1);
    assert_eq!(graph.dependent_count(rotate).unwrap(), 1);
    assert_eq!(graph.dependent_count(scale).unwrap(), 1);
    // Old composite released, new one attached: no arena growth.
    assert_eq!(graph.len(), live_nodes);

    drive(&mut graph, &mut component, &mut host, rotate, Value::f(0.2)).unwrap();
    let styled = host.set_props_calls[0].1.get("style").unwrap();
    let style_map = styled.as_map().unwrap();
    assert_eq!(style_map.get("opacity"), Some(&Value::Float(0.5)));
}

#[test]
fn lifecycle_misuse_is_rejected() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(WrapperConfig::new("card"), initial);

    // Commit before entering Mounting.
    assert!(matches!(
        component.did_mount(&graph, &mut backend, &mut host),
        Err(BindingError::Lifecycle { .. })
    ));

    // Prop update before mount.
    let next = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    assert!(matches!(
        component.will_receive_props(&mut graph, &mut backend, next),
        Err(BindingError::Lifecycle { .. })
    ));
}

#[test]
fn unresolvable_view_is_fatal() {
    let mut graph = GraphRegistry::new();
    let mut backend = RecordingBackend::new();
    let mut host = MockRenderHost::new();
    let opacity = leaf(&mut graph, 1.0);

    let initial = bag(&mut graph, vec![("opacity", RawProp::Node(opacity))]);
    let mut component = AnimatedComponent::new(WrapperConfig::new("ghost"), initial);
    component.will_mount(&mut graph, &mut backend).unwrap();
    assert!(matches!(
        component.did_mount(&graph, &mut backend, &mut host),
        Err(BindingError::ViewUnresolved(_))
    ));
}

//! AnimatedProps: the prop-binding engine.
//!
//! Owns the current property bag, classifies its entries, maintains the
//! subscriptions that tie them to the dependency graph, and manages the
//! host/native execution-mode transition for the whole property set. The
//! instance is itself represented in the graph by a props composite node;
//! the consumer edge on that composite is what change notifications key on.

use indexmap::IndexMap;
use kinet_api_core::{ValueMap, ViewTag};
use kinet_graph_core::{GraphRegistry, NodeTag};
use serde::{Deserialize, Serialize};

use crate::backend::NativeAnimationBackend;
use crate::diff::{self, DiffPlan};
use crate::error::BindingError;
use crate::observer::{BindDecision, BindingObserver, NoopObserver};
use crate::props::{PropValue, PropertyBag};

/// Snapshot of the bag as rendering consumes it: resolved values plus the
/// names of the events the host must wire up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedProps {
    pub values: ValueMap,
    pub events: Vec<String>,
}

/// Serializable description of the composite for the backend handoff.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NativePropsConfig {
    pub composite: NodeTag,
    pub props: IndexMap<String, NodeTag>,
}

#[derive(Debug)]
pub struct AnimatedProps {
    bag: PropertyBag,
    view: Option<ViewTag>,
    event_view: Option<ViewTag>,
    props_tag: Option<NodeTag>,
    attached: bool,
    is_native: bool,
    has_returned_value: bool,
    reattach_all: bool,
    observer: Box<dyn BindingObserver>,
}

impl AnimatedProps {
    pub fn new(bag: PropertyBag) -> Self {
        Self::with_observer(bag, Box::new(NoopObserver))
    }

    pub fn with_observer(bag: PropertyBag, observer: Box<dyn BindingObserver>) -> Self {
        Self {
            bag,
            view: None,
            event_view: None,
            props_tag: None,
            attached: false,
            is_native: false,
            has_returned_value: false,
            reattach_all: false,
            observer,
        }
    }

    pub fn bag(&self) -> &PropertyBag {
        &self.bag
    }

    pub fn view(&self) -> Option<ViewTag> {
        self.view
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_native(&self) -> bool {
        self.is_native
    }

    /// Tag of the props composite while attached.
    pub fn composite_tag(&self) -> Option<NodeTag> {
        self.props_tag
    }

    /// Every style composite in the bag must still resolve; a dangling tag
    /// means attach/detach calls were made out of the required order.
    fn ensure_style_composites(&self, graph: &GraphRegistry) -> Result<(), BindingError> {
        for (key, value) in self.bag.iter() {
            if let PropValue::Style(tag) = value {
                if !graph.contains(*tag) {
                    return Err(BindingError::MissingStyleComposite(key.clone()));
                }
            }
        }
        Ok(())
    }

    /// Subscribe this instance to every animated value/style node in the
    /// current bag and, when a view is already bound, attach native-capable
    /// event refs to it. Must be paired with [`detach`](Self::detach).
    pub fn attach(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
    ) -> Result<(), BindingError> {
        if self.attached {
            return Err(BindingError::AlreadyAttached);
        }
        self.ensure_style_composites(graph)?;

        let tag = graph.create_props(self.bag.value_entries());
        graph.attach_consumer(tag)?;
        if self.is_native {
            graph.make_native(tag)?;
            if let Some(view) = self.view {
                backend.connect_node_to_view(tag, view);
            }
        }
        self.props_tag = Some(tag);
        self.attached = true;

        if let Some(target) = self.event_view {
            for event in self.bag.events_mut() {
                event.attach(target, backend);
            }
        }
        Ok(())
    }

    /// Tear down all subscriptions, in strict order: view disconnect first
    /// (so the backend cannot deliver a stale callback into a half-torn-down
    /// consumer), then event refs, then value/style subscriptions.
    pub fn detach(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
    ) -> Result<(), BindingError> {
        if !self.attached {
            return Ok(());
        }
        let tag = self.props_tag.take().ok_or(BindingError::NotAttached)?;

        if self.is_native {
            if let Some(view) = self.view {
                backend.disconnect_node_from_view(tag, view);
            }
        }
        for event in self.bag.events_mut() {
            event.detach(backend);
        }
        graph.detach_consumer(tag)?;
        graph.release(tag)?;
        self.attached = false;
        Ok(())
    }

    /// Rebind to a new view handle (and event target). Identical handles
    /// short-circuit so redundant native calls are never issued.
    pub fn update_view(
        &mut self,
        next: ViewTag,
        target: ViewTag,
        backend: &mut dyn NativeAnimationBackend,
    ) {
        if self.view == Some(next) && self.event_view == Some(target) {
            return;
        }
        let view_changed = self.view != Some(next);
        for event in self.bag.events_mut() {
            event.detach(backend);
        }
        if self.is_native && view_changed {
            if let (Some(old), Some(tag)) = (self.view, self.props_tag) {
                backend.disconnect_node_from_view(tag, old);
            }
        }

        self.view = Some(next);
        self.event_view = Some(target);

        if self.is_native && view_changed {
            if let Some(tag) = self.props_tag {
                backend.connect_node_to_view(tag, next);
            }
        }
        for event in self.bag.events_mut() {
            event.attach(target, backend);
        }
    }

    /// Delegate recomputation of the whole property set to the native
    /// backend. Idempotent. If a value snapshot was already observed through
    /// [`get_value`](Self::get_value), the next `update_props` must reattach
    /// every key so downstream consumers re-sync instead of watching native
    /// keys vanish from snapshots.
    pub fn make_native(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
    ) -> Result<(), BindingError> {
        if self.is_native {
            return Ok(());
        }
        self.is_native = true;

        for (_, tag) in self.bag.value_entries() {
            graph.make_native(tag)?;
        }
        if let Some(tag) = self.props_tag {
            graph.make_native(tag)?;
            if let Some(view) = self.view {
                backend.connect_node_to_view(tag, view);
            }
        }
        if self.has_returned_value {
            self.reattach_all = true;
        }
        Ok(())
    }

    /// Replace the property bag, reattaching the minimal set of keys.
    pub fn update_props(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
        next: PropertyBag,
    ) -> Result<(), BindingError> {
        if !self.attached {
            // No live subscriptions to migrate; adopt the bag wholesale.
            let old = std::mem::replace(&mut self.bag, next);
            release_unused_styles(graph, &old, &self.bag);
            self.reattach_all = false;
            return Ok(());
        }

        let forced = self.reattach_all;
        let plan = if forced {
            DiffPlan::Structural
        } else {
            diff::plan(graph, &self.bag, &next)
        };
        match plan {
            DiffPlan::Structural => self.reattach_everything(graph, backend, next, forced)?,
            DiffPlan::Keys(changed) => self.reattach_keys(graph, backend, next, &changed)?,
        }
        self.reattach_all = false;
        Ok(())
    }

    /// Full replacement of the attachment. New nodes are attached before the
    /// old ones are detached so shared children never pass through a
    /// transient zero-reference state that would cascade teardown.
    fn reattach_everything(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
        next: PropertyBag,
        forced: bool,
    ) -> Result<(), BindingError> {
        let decision = if forced {
            BindDecision::Forced
        } else {
            BindDecision::Structural
        };

        let new_tag = graph.create_props(next.value_entries());
        graph.attach_consumer(new_tag)?;
        if self.is_native {
            graph.make_native(new_tag)?;
            if let Some(view) = self.view {
                backend.connect_node_to_view(new_tag, view);
            }
        }

        let mut old = std::mem::replace(&mut self.bag, next);
        for event in old.events_mut() {
            event.detach(backend);
        }
        if let Some(target) = self.event_view {
            for event in self.bag.events_mut() {
                event.attach(target, backend);
            }
        }

        if let Some(old_tag) = self.props_tag.take() {
            if self.is_native {
                if let Some(view) = self.view {
                    backend.disconnect_node_from_view(old_tag, view);
                }
            }
            graph.detach_consumer(old_tag)?;
            graph.release(old_tag)?;
        }
        self.props_tag = Some(new_tag);

        release_unused_styles(graph, &old, &self.bag);
        for key in self.bag.keys() {
            self.observer.on_decision(key, decision, self.view);
        }
        Ok(())
    }

    /// Same-shape update: each changed key is replaced atomically (old
    /// binding down, new binding up); unchanged keys carry over by
    /// reference, preserving their subscriptions.
    fn reattach_keys(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
        next: PropertyBag,
        changed: &[String],
    ) -> Result<(), BindingError> {
        let props_tag = self.props_tag.ok_or(BindingError::NotAttached)?;
        let mut old = std::mem::take(&mut self.bag);
        let mut rebuilt = PropertyBag::default();
        let mut decisions = Vec::with_capacity(next.len());

        for (key, new_value) in next.into_entries() {
            let mut new_value = new_value;
            let old_value = match old.shift_remove(&key) {
                Some(keep) if !changed.contains(&key) => {
                    // Carried over by reference, preserving its subscription.
                    // Drop the freshly ingested duplicate composite, if any.
                    if let (PropValue::Style(kept), PropValue::Style(dup)) = (&keep, &new_value) {
                        if kept != dup {
                            graph.release_if_unused(*dup);
                        }
                    }
                    decisions.push((key.clone(), BindDecision::Reuse));
                    rebuilt.insert(key, keep);
                    continue;
                }
                other => other,
            };

            match &mut new_value {
                // Value-classified replacement: swap the composite edge.
                PropValue::Node(tag) | PropValue::Style(tag) => {
                    let tag = *tag;
                    graph.props_replace(props_tag, &key, Some(tag))?;
                    if self.is_native {
                        graph.make_native(tag)?;
                    }
                    if let Some(PropValue::Style(old_tag)) = old_value {
                        graph.release_if_unused(old_tag);
                    }
                }
                // Event replacement: detach the old binding, attach the new.
                PropValue::Event(event) => {
                    if let Some(PropValue::Event(mut old_event)) = old_value {
                        old_event.detach(backend);
                    }
                    if let Some(target) = self.event_view {
                        event.attach(target, backend);
                    }
                }
                // Statics carry no graph state.
                PropValue::Static(_) => {}
            }

            decisions.push((key.clone(), BindDecision::Reattach));
            rebuilt.insert(key, new_value);
        }

        // Anything left in `old` was removed from the bag. The diff routes
        // only static keys here; they disappear with the old bag.
        drop(old);

        self.bag = rebuilt;
        for (key, decision) in decisions {
            self.observer.on_decision(&key, decision, self.view);
        }
        Ok(())
    }

    /// Resolve the bag for rendering. Marks that a snapshot escaped this
    /// instance, which arms the reattach-all safety path on a later
    /// native transition. Native keys are omitted: the backend owns their
    /// delivery to the view.
    pub fn get_value(&mut self, graph: &GraphRegistry) -> Result<ResolvedProps, BindingError> {
        self.has_returned_value = true;
        let mut resolved = ResolvedProps::default();
        for (key, value) in self.bag.iter() {
            match value {
                PropValue::Static(v) => {
                    resolved.values.insert(key.clone(), v.clone());
                }
                PropValue::Node(tag) => {
                    if !graph.is_native(*tag)? {
                        resolved.values.insert(key.clone(), graph.current_value(*tag)?);
                    }
                }
                PropValue::Style(tag) => {
                    if !graph.contains(*tag) {
                        return Err(BindingError::MissingStyleComposite(key.clone()));
                    }
                    if !graph.is_native(*tag)? {
                        resolved.values.insert(key.clone(), graph.current_value(*tag)?);
                    }
                }
                PropValue::Event(event) => resolved.events.push(event.name.clone()),
            }
        }
        Ok(resolved)
    }

    /// Only the animated-derived values, for the direct-mutation fast path.
    pub fn get_animated_only_value(
        &self,
        graph: &GraphRegistry,
    ) -> Result<ValueMap, BindingError> {
        let mut values = ValueMap::new();
        for (key, value) in self.bag.iter() {
            match value {
                PropValue::Node(tag) => {
                    values.insert(key.clone(), graph.current_value(*tag)?);
                }
                PropValue::Style(tag) => {
                    let style = graph
                        .current_value(*tag)
                        .map_err(|_| BindingError::MissingStyleComposite(key.clone()))?;
                    values.insert(key.clone(), style);
                }
                PropValue::Static(_) | PropValue::Event(_) => {}
            }
        }
        Ok(values)
    }

    /// Serializable composite description for the backend handoff.
    pub fn get_native_config(&self) -> Result<NativePropsConfig, BindingError> {
        if !self.is_native {
            return Err(BindingError::NotNative);
        }
        let composite = self.props_tag.ok_or(BindingError::NotAttached)?;
        let mut props = IndexMap::new();
        for (key, tag) in self.bag.value_entries() {
            props.insert(key, tag);
        }
        Ok(NativePropsConfig { composite, props })
    }

    /// Release the style composites the bag owns. Called once the owning
    /// component is torn down, after [`detach`](Self::detach).
    pub fn dispose(&mut self, graph: &mut GraphRegistry) {
        for tag in self.bag.style_tags() {
            graph.release_if_unused(tag);
        }
    }

    /// Whether a value snapshot has ever been returned.
    pub fn has_returned_value(&self) -> bool {
        self.has_returned_value
    }

    /// Whether the next update will reattach every key.
    pub fn reattach_all_pending(&self) -> bool {
        self.reattach_all
    }
}

/// Release composites owned by `old` that `kept` does not reference.
fn release_unused_styles(graph: &mut GraphRegistry, old: &PropertyBag, kept: &PropertyBag) {
    let kept_tags = kept.style_tags();
    for tag in old.style_tags() {
        if !kept_tags.contains(&tag) {
            graph.release_if_unused(tag);
        }
    }
}
